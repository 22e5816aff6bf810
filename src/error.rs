//! Error taxonomy shared by every knowlens operation.
//!
//! Each variant carries enough context (path, module, cause) for the CLI to
//! report it, plus a stable machine-readable code and a suggested fix.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KnowlensError>;

#[derive(Debug, Error)]
pub enum KnowlensError {
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("scan failed: {} ({cause})", path.display())]
    Scan { path: PathBuf, cause: String },

    #[error("read failed: {} ({cause})", path.display())]
    Read { path: PathBuf, cause: String },

    #[error("write failed: {} ({cause})", path.display())]
    Write { path: PathBuf, cause: String },

    #[error("failed to parse {}: {cause}", path.display())]
    Parse { path: PathBuf, cause: String },

    #[error("template `{template}` failed: {cause}")]
    Template { template: String, cause: String },

    #[error("module detection failed: {0}")]
    ModuleDetection(String),

    #[error("prerequisite missing: {missing}")]
    Prerequisite { missing: String, suggestion: String },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("invalid module name `{0}`")]
    InvalidModuleName(String),
}

impl KnowlensError {
    pub fn write(path: &Path, cause: impl ToString) -> Self {
        KnowlensError::Write {
            path: path.to_path_buf(),
            cause: cause.to_string(),
        }
    }

    pub fn read(path: &Path, cause: impl ToString) -> Self {
        KnowlensError::Read {
            path: path.to_path_buf(),
            cause: cause.to_string(),
        }
    }

    pub fn template(template: &str, cause: impl ToString) -> Self {
        KnowlensError::Template {
            template: template.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Machine-readable error code (UPPER_SNAKE_CASE)
    pub fn code(&self) -> &'static str {
        match self {
            KnowlensError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            KnowlensError::ConfigInvalid(_) => "CONFIG_INVALID",
            KnowlensError::Scan { .. } => "SCAN_ERROR",
            KnowlensError::Read { .. } => "READ_ERROR",
            KnowlensError::Write { .. } => "WRITE_ERROR",
            KnowlensError::Parse { .. } => "PARSE_ERROR",
            KnowlensError::Template { .. } => "TEMPLATE_ERROR",
            KnowlensError::ModuleDetection(_) => "MODULE_DETECTION_ERROR",
            KnowlensError::Prerequisite { .. } => "PREREQUISITE_ERROR",
            KnowlensError::AlreadyExists(_) => "ALREADY_EXISTS",
            KnowlensError::InvalidModuleName(_) => "INVALID_MODULE_NAME",
        }
    }

    /// Actionable fix for the user
    pub fn suggestion(&self) -> String {
        match self {
            KnowlensError::ConfigNotFound { .. } => {
                "Run `knowlens init` to create a config file".to_string()
            }
            KnowlensError::ConfigInvalid(_) => {
                "Check the syntax and required fields of .knowlens.toml".to_string()
            }
            KnowlensError::Scan { .. } => {
                "Check that the directory exists and the glob patterns are valid".to_string()
            }
            KnowlensError::Read { .. } => "Check that the file exists and is readable".to_string(),
            KnowlensError::Write { .. } => "Check write permissions for the target path".to_string(),
            KnowlensError::Parse { .. } => "Check the file for syntax errors".to_string(),
            KnowlensError::Template { .. } => {
                "Check that the template exists and its context is complete".to_string()
            }
            KnowlensError::ModuleDetection(_) => {
                "Check the project layout, or write module-map.yaml by hand".to_string()
            }
            KnowlensError::Prerequisite { suggestion, .. } => suggestion.clone(),
            KnowlensError::AlreadyExists(_) => {
                "Remove the existing file first to re-initialize".to_string()
            }
            KnowlensError::InvalidModuleName(_) => {
                "Module names are single path segments without `/`, `\\` or `..`".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let err = KnowlensError::ModuleDetection("boom".to_string());
        assert_eq!(err.code(), "MODULE_DETECTION_ERROR");
        assert_eq!(err.to_string(), "module detection failed: boom");

        let err = KnowlensError::template("module-readme", "missing");
        assert_eq!(err.code(), "TEMPLATE_ERROR");
        assert!(err.to_string().contains("module-readme"));
    }

    #[test]
    fn test_prerequisite_carries_suggestion() {
        let err = KnowlensError::Prerequisite {
            missing: "module-map.yaml".to_string(),
            suggestion: "Run `knowlens steer` first".to_string(),
        };
        assert_eq!(err.suggestion(), "Run `knowlens steer` first");
    }
}
