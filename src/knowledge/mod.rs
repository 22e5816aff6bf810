//! Knowledge base operations: bootstrapping, steering (module detection),
//! full generation and incremental updates driven by delta-specs.

mod docs;
pub mod generate;
pub mod init;
pub mod steer;
pub mod update;

use std::path::{Path, PathBuf};

use crate::config::{Config, KnowledgePaths};
use crate::error::Result;
use crate::registry::RegistryStore;
use crate::scan::ScanOptions;

pub use docs::{infer_file_description, KeyFile, ModuleStatus, MAX_KEY_FILES};
pub use generate::{generate, GenerateOptions, GeneratedModule, KnowledgeResult};
pub use init::{init_knowledge, InitOptions, KnowledgeInitResult};
pub use steer::{build_directory_tree, steer, ModuleSummary, SteerOptions, SteeringResult};
pub use update::{
    mark_module_deprecated, update, DeprecationOutcome, KnowledgeUpdateResult, UpdateMode,
    DEPRECATION_MARKER,
};

/// A project root together with its loaded configuration
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub paths: KnowledgePaths,
}

impl Workspace {
    /// Load `.knowlens.toml` from `root`
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: &Path, config: Config) -> Self {
        let paths = config.paths(root);
        Self {
            root: root.to_path_buf(),
            config,
            paths,
        }
    }

    pub fn registry(&self) -> RegistryStore {
        RegistryStore::new(self.paths.registry())
    }

    /// Configured depth and excludes. The knowledge base itself is never scanned.
    pub fn scan_options(&self) -> ScanOptions {
        let mut exclude = self.config.exclude.clone();
        exclude.push(format!("{}/**", self.paths.base));
        ScanOptions {
            depth: self.config.scan.depth,
            exclude,
        }
    }
}
