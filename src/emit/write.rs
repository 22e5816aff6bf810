use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KnowlensError, Result};

/// Write `content` to `path` via a temp file + rename, creating parent
/// directories as needed. Readers observe either the old or the new content.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = temp_path_for(path);
    let written = fs::write(&temp_path, content).and_then(|_| fs::rename(&temp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(KnowlensError::write(path, e));
    }

    Ok(())
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| KnowlensError::write(dir, e))
}

/// Read a document if it exists. `Ok(None)` when the file is absent.
pub fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(KnowlensError::read(path, e)),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("knowlens");
    path.with_file_name(format!("{}.tmp.{}", file_name, std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b").join("doc.md");

        atomic_write(&target, "hello").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("doc.md");

        atomic_write(&target, "old").unwrap();
        atomic_write(&target, "new").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_into_file_parent_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = atomic_write(&blocker.join("doc.md"), "content").unwrap_err();
        assert_eq!(err.code(), "WRITE_ERROR");
    }

    #[test]
    fn test_read_existing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("doc.md");
        assert_eq!(read_existing(&target).unwrap(), None);

        fs::write(&target, "body").unwrap();
        assert_eq!(read_existing(&target).unwrap().as_deref(), Some("body"));
    }
}
