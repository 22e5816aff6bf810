//! Persistence of the module registry (`module-map.yaml`).

use std::path::{Path, PathBuf};

use crate::emit::{atomic_write, read_existing};
use crate::error::{KnowlensError, Result};
use crate::types::ModuleRegistry;

pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load a registry that must exist
    pub fn load(&self) -> Result<ModuleRegistry> {
        self.load_optional()?
            .ok_or_else(|| KnowlensError::Prerequisite {
                missing: self.path.display().to_string(),
                suggestion: "Run `knowlens steer` to detect modules first".to_string(),
            })
    }

    /// `Ok(None)` when the file is absent; malformed YAML is still an error
    pub fn load_optional(&self) -> Result<Option<ModuleRegistry>> {
        let Some(raw) = read_existing(&self.path)? else {
            return Ok(None);
        };
        parse_registry(&raw, &self.path).map(Some)
    }

    /// Treat a missing or malformed registry as absent
    pub fn load_lenient(&self) -> Option<ModuleRegistry> {
        match self.load_optional() {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable registry: {}", e);
                None
            }
        }
    }

    pub fn save(&self, registry: &ModuleRegistry) -> Result<()> {
        let yaml = serde_yaml::to_string(registry).map_err(|e| KnowlensError::write(&self.path, e))?;
        atomic_write(&self.path, &yaml)?;
        tracing::debug!(
            path = %self.path.display(),
            modules = registry.modules.len(),
            "saved module registry"
        );
        Ok(())
    }
}

fn parse_registry(raw: &str, path: &Path) -> Result<ModuleRegistry> {
    if raw.trim().is_empty() {
        return Ok(ModuleRegistry::default());
    }
    serde_yaml::from_str(raw).map_err(|e| KnowlensError::Parse {
        path: path.to_path_buf(),
        cause: e.to_string(),
    })
}
