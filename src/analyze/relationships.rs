//! Cross-module dependency inference from import statements.
//!
//! Only the first [`MAX_FILES_PER_MODULE`] files of each module (in scan order)
//! are read. This caps I/O on large modules at the cost of missing imports
//! that only appear in later files. A module `A` depends on `B` when one of
//! A's import literals contains B's name, or when one of B's file paths
//! contains the import literal (with a leading `./` stripped). Both checks are
//! plain substring tests, so short module names can over-match.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use super::parser::{extract_imports, normalize_import};
use crate::error::{KnowlensError, Result};
use crate::scan::path_in_module;
use crate::types::Module;

/// Number of files sampled per module when looking for imports
pub const MAX_FILES_PER_MODULE: usize = 20;

/// Source of file contents for relationship inference
pub trait SourceReader {
    fn read_source(&self, relative_path: &str) -> io::Result<String>;
}

/// Reads files relative to a project root on disk
pub struct ProjectSources {
    root: PathBuf,
}

impl ProjectSources {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl SourceReader for ProjectSources {
    fn read_source(&self, relative_path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(relative_path))
    }
}

impl SourceReader for HashMap<String, String> {
    fn read_source(&self, relative_path: &str) -> io::Result<String> {
        self.get(relative_path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, relative_path.to_string()))
    }
}

/// Files of `module` in scan order, selected by its path globs
pub fn module_files<'a>(module: &Module, files: &'a [String]) -> Vec<&'a String> {
    files
        .iter()
        .filter(|f| module.paths.iter().any(|p| path_in_module(f, p)))
        .collect()
}

/// Fill `depends_on`/`used_by` for every module. Existing relationship
/// entries are kept; both lists are deduplicated afterwards.
pub fn detect_relationships(
    modules: &mut [Module],
    files: &[String],
    sources: &dyn SourceReader,
) -> Result<()> {
    let owned: Vec<Vec<&String>> = modules.iter().map(|m| module_files(m, files)).collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();

    for (i, module) in modules.iter().enumerate() {
        let imports = collect_imports(&owned[i], sources)?;
        if imports.is_empty() {
            continue;
        }

        for (j, other) in modules.iter().enumerate() {
            if other.name == module.name {
                continue;
            }
            let references = imports.iter().any(|import| {
                owned[j].iter().any(|f| {
                    import.contains(other.name.as_str()) || f.contains(normalize_import(import))
                })
            });
            if references {
                edges.push((i, j));
            }
        }
    }

    for (i, j) in edges {
        let (from, to) = (modules[i].name.clone(), modules[j].name.clone());
        modules[i].relationships.depends_on.push(to);
        modules[j].relationships.used_by.push(from);
    }

    for module in modules.iter_mut() {
        dedup_in_place(&mut module.relationships.depends_on);
        dedup_in_place(&mut module.relationships.used_by);
    }

    Ok(())
}

fn collect_imports(files: &[&String], sources: &dyn SourceReader) -> Result<Vec<String>> {
    let mut imports: Vec<String> = Vec::new();

    for file in files.iter().take(MAX_FILES_PER_MODULE) {
        let content = match sources.read_source(file) {
            Ok(content) => content,
            Err(e) if is_skippable(&e) => {
                tracing::debug!(file = %file, "skipping unreadable source: {}", e);
                continue;
            }
            Err(e) => {
                return Err(KnowlensError::ModuleDetection(format!(
                    "failed to read {}: {}",
                    file, e
                )))
            }
        };

        for import in extract_imports(&content) {
            if !imports.contains(&import) {
                imports.push(import);
            }
        }
    }

    Ok(imports)
}

/// Missing, binary and permission-restricted files are simply not sampled
fn is_skippable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::InvalidData | io::ErrorKind::PermissionDenied
    )
}

pub(crate) fn dedup_in_place(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, glob: &str) -> Module {
        Module::new(name, "", vec![glob.to_string()])
    }

    fn sources(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_import_by_module_name() {
        let mut modules = vec![
            module("services", "src/services/**"),
            module("lib", "src/lib/**"),
        ];
        let f = files(&["src/lib/config.ts", "src/services/auth.ts"]);
        let src = sources(&[(
            "src/services/auth.ts",
            "import { config } from \"../lib/config.js\";",
        )]);

        detect_relationships(&mut modules, &f, &src).unwrap();

        assert_eq!(modules[0].relationships.depends_on, vec!["lib"]);
        assert_eq!(modules[1].relationships.used_by, vec!["services"]);
        assert!(modules[1].relationships.depends_on.is_empty());
    }

    #[test]
    fn test_import_by_path_substring() {
        let mut modules = vec![module("web", "web/**"), module("shared", "pkg/common/**")];
        let f = files(&["pkg/common/format.ts", "web/page.ts"]);
        let src = sources(&[("web/page.ts", "import { fmt } from './pkg/common/format';")]);

        detect_relationships(&mut modules, &f, &src).unwrap();

        assert_eq!(modules[0].relationships.depends_on, vec!["shared"]);
        assert_eq!(modules[1].relationships.used_by, vec!["web"]);
    }

    #[test]
    fn test_module_without_files_is_never_a_dependency() {
        let mut modules = vec![module("services", "src/services/**"), module("lib", "src/lib/**")];
        let f = files(&["src/services/auth.ts"]);
        let src = sources(&[("src/services/auth.ts", "import x from '../lib/x';")]);

        detect_relationships(&mut modules, &f, &src).unwrap();

        assert!(modules[0].relationships.depends_on.is_empty());
    }

    #[test]
    fn test_relationships_deduplicated() {
        let mut modules = vec![module("services", "src/services/**"), module("lib", "src/lib/**")];
        let f = files(&["src/lib/a.ts", "src/services/a.ts", "src/services/b.ts"]);
        let src = sources(&[
            ("src/services/a.ts", "import a from '../lib/a';"),
            ("src/services/b.ts", "import a from '../lib/a';\nimport b from '../lib/b';"),
        ]);
        modules[0].relationships.depends_on.push("lib".to_string());

        detect_relationships(&mut modules, &f, &src).unwrap();

        assert_eq!(modules[0].relationships.depends_on, vec!["lib"]);
        assert_eq!(modules[1].relationships.used_by, vec!["services"]);
    }

    #[test]
    fn test_only_first_files_sampled() {
        let mut modules = vec![module("big", "big/**"), module("lib", "lib/**")];
        let mut f: Vec<String> = (0..MAX_FILES_PER_MODULE)
            .map(|i| format!("big/f{:02}.ts", i))
            .collect();
        f.push("big/zz_last.ts".to_string());
        f.push("lib/util.ts".to_string());
        let src = sources(&[("big/zz_last.ts", "import u from '../lib/util';")]);

        detect_relationships(&mut modules, &f, &src).unwrap();

        assert!(modules[0].relationships.depends_on.is_empty());
        assert!(modules[1].relationships.used_by.is_empty());
    }

    #[test]
    fn test_no_self_reference() {
        let mut modules = vec![module("lib", "src/lib/**")];
        let f = files(&["src/lib/a.ts"]);
        let src = sources(&[("src/lib/a.ts", "import b from './lib/b';")]);

        detect_relationships(&mut modules, &f, &src).unwrap();

        assert!(modules[0].relationships.depends_on.is_empty());
        assert!(modules[0].relationships.used_by.is_empty());
    }

    struct FailingSources;

    impl SourceReader for FailingSources {
        fn read_source(&self, _relative_path: &str) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_unexpected_read_error_is_wrapped() {
        let mut modules = vec![module("lib", "src/lib/**")];
        let f = files(&["src/lib/a.ts"]);

        let err = detect_relationships(&mut modules, &f, &FailingSources).unwrap_err();
        assert!(matches!(err, KnowlensError::ModuleDetection(ref msg) if msg.contains("disk on fire")));
    }
}
