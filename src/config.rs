//! Project configuration (`.knowlens.toml`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KnowlensError, Result};

pub const CONFIG_FILENAME: &str = ".knowlens.toml";
pub const DEFAULT_KNOWLEDGE_PATH: &str = "docs/ai-knowledge";
pub const DEFAULT_SCAN_DEPTH: usize = 10;

pub const REGISTRY_FILENAME: &str = "module-map.yaml";
pub const INDEX_FILENAME: &str = "_index.md";
pub const ARCHITECTURE_FILENAME: &str = "architecture.md";
pub const MODULE_DOC_FILENAME: &str = "README.md";
pub const RAW_SCAN_FILENAME: &str = "raw-scan.md";
pub const CONVENTIONS_FILENAME: &str = "_conventions.md";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extra exclude globs applied on top of the built-in ones
    #[serde(default)]
    pub exclude: Vec<String>,
    pub project: ProjectConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_path")]
    pub base_path: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_path: default_knowledge_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_scan_depth")]
    pub depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            depth: default_scan_depth(),
        }
    }
}

fn default_knowledge_path() -> String {
    DEFAULT_KNOWLEDGE_PATH.to_string()
}

fn default_scan_depth() -> usize {
    DEFAULT_SCAN_DEPTH
}

impl Config {
    pub fn new(project_name: &str) -> Self {
        Self {
            exclude: Vec::new(),
            project: ProjectConfig {
                name: project_name.to_string(),
                version: None,
            },
            knowledge: KnowledgeConfig::default(),
            scan: ScanConfig::default(),
        }
    }

    /// Load and validate `.knowlens.toml` from the project root
    pub fn load(root: &Path) -> Result<Self> {
        let path = config_path(root);
        if !path.exists() {
            return Err(KnowlensError::ConfigNotFound { path });
        }

        let raw = fs::read_to_string(&path).map_err(|e| KnowlensError::read(&path, e))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| KnowlensError::ConfigInvalid(e.to_string()))?;

        if config.project.name.trim().is_empty() {
            return Err(KnowlensError::ConfigInvalid(
                "project.name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| KnowlensError::ConfigInvalid(e.to_string()))
    }

    /// Knowledge base directory relative to the project root
    pub fn knowledge_base(&self) -> &str {
        self.knowledge.base_path.trim_end_matches('/')
    }

    pub fn paths(&self, root: &Path) -> KnowledgePaths {
        KnowledgePaths::new(root, self.knowledge_base())
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILENAME)
}

/// Module names become a directory under `modules/`, so they must be a single
/// relative path segment.
pub fn validate_module_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || Path::new(name).is_absolute();
    if invalid {
        return Err(KnowlensError::InvalidModuleName(name.to_string()));
    }
    Ok(())
}

/// Every location the knowledge base writes to, derived from the config.
#[derive(Debug, Clone)]
pub struct KnowledgePaths {
    pub root: PathBuf,
    /// Knowledge base directory relative to `root`, `/`-separated
    pub base: String,
}

impl KnowledgePaths {
    pub fn new(root: &Path, base: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            base: base.to_string(),
        }
    }

    pub fn knowledge_dir(&self) -> PathBuf {
        self.root.join(&self.base)
    }

    pub fn registry(&self) -> PathBuf {
        self.knowledge_dir().join(REGISTRY_FILENAME)
    }

    pub fn index(&self) -> PathBuf {
        self.knowledge_dir().join(INDEX_FILENAME)
    }

    pub fn architecture(&self) -> PathBuf {
        self.knowledge_dir().join(ARCHITECTURE_FILENAME)
    }

    pub fn raw_scan(&self) -> PathBuf {
        self.knowledge_dir().join(RAW_SCAN_FILENAME)
    }

    pub fn conventions(&self) -> PathBuf {
        self.knowledge_dir().join(CONVENTIONS_FILENAME)
    }

    pub fn module_doc(&self, module: &str) -> PathBuf {
        self.knowledge_dir()
            .join("modules")
            .join(module)
            .join(MODULE_DOC_FILENAME)
    }

    /// Relative display path for a knowledge base file, e.g. `docs/ai-knowledge/_index.md`
    pub fn relative(&self, file: &str) -> String {
        format!("{}/{}", self.base, file)
    }

    pub fn relative_module_doc(&self, module: &str) -> String {
        format!("{}/modules/{}/{}", self.base, module, MODULE_DOC_FILENAME)
    }
}
