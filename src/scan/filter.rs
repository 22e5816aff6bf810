use ignore::overrides::{Override, OverrideBuilder};
use std::path::Path;

use crate::error::{KnowlensError, Result};

/// Always excluded: VCS metadata, dependency and build output directories
pub const DEFAULT_IGNORE: &[&str] = &[
    "node_modules/**",
    ".git/**",
    "dist/**",
    "build/**",
    "coverage/**",
    ".next/**",
    ".nuxt/**",
    "__pycache__/**",
    ".venv/**",
    "venv/**",
    "target/**",
];

/// Always excluded: credentials, keys and env files
pub const SENSITIVE_PATTERNS: &[&str] = &[
    "**/*.env*",
    "**/*credential*",
    "**/*secret*",
    "**/*.key",
    "**/*.pem",
];

/// Compiled include/exclude globs for one scan
pub struct FileFilter {
    include: Override,
    exclude: Override,
    prune: Override,
}

impl FileFilter {
    pub fn new(root: &Path, patterns: &[String], extra_exclude: &[String]) -> Result<Self> {
        let excludes: Vec<String> = DEFAULT_IGNORE
            .iter()
            .chain(SENSITIVE_PATTERNS.iter())
            .map(|s| s.to_string())
            .chain(extra_exclude.iter().cloned())
            .collect();

        // Directories whose whole subtree is excluded can be skipped without descending
        let prunable: Vec<String> = excludes
            .iter()
            .filter_map(|p| p.strip_suffix("/**"))
            .filter(|p| !p.contains('*'))
            .map(|p| p.to_string())
            .collect();

        Ok(Self {
            include: build_override(root, patterns)?,
            exclude: build_override(root, &excludes)?,
            prune: build_override(root, &prunable)?,
        })
    }

    /// Whether a file (relative, `/`-separated) should be part of the scan result
    pub fn should_include_file(&self, relative_path: &str) -> bool {
        if self.exclude.matched(relative_path, false).is_whitelist() {
            return false;
        }
        self.include.matched(relative_path, false).is_whitelist()
    }

    /// Whether the walker should skip a directory entirely
    pub fn should_prune_dir(&self, relative_path: &str) -> bool {
        self.prune.matched(relative_path, true).is_whitelist()
    }
}

fn build_override(root: &Path, patterns: &[String]) -> Result<Override> {
    let mut builder = OverrideBuilder::new(root);
    for pattern in patterns {
        builder.add(pattern).map_err(|e| KnowlensError::Scan {
            path: root.to_path_buf(),
            cause: format!("invalid pattern `{}`: {}", pattern, e),
        })?;
    }
    builder.build().map_err(|e| KnowlensError::Scan {
        path: root.to_path_buf(),
        cause: e.to_string(),
    })
}

/// Whether `file` falls under a module glob such as `src/services/**`.
/// Only the literal prefix before `/**` is compared.
pub fn path_in_module(file: &str, glob: &str) -> bool {
    let base = glob.strip_suffix("/**").unwrap_or(glob);
    file.starts_with(base)
}
