use serde::{Deserialize, Serialize};

/// Cross-module links inferred from imports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationships {
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub used_by: Vec<String>,
}

/// A detected or registered logical unit of the target codebase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Glob patterns selecting the module's files, e.g. `src/services/**`
    pub paths: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub relationships: Relationships,
}

impl Module {
    pub fn new(name: &str, description: &str, paths: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            paths,
            keywords: Vec::new(),
            relationships: Relationships::default(),
        }
    }

    /// Placeholder entry for a module that only appeared in a delta-spec
    pub fn synthesized(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{} module", name),
            paths: vec![format!("src/{}/**", name)],
            keywords: vec![name.to_string()],
            relationships: Relationships::default(),
        }
    }
}

/// Persisted ordered collection of all known modules (`module-map.yaml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRegistry {
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl ModuleRegistry {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Case-insensitive lookup by module name
    pub fn find(&self, name: &str) -> Option<&Module> {
        let needle = name.to_lowercase();
        self.modules.iter().find(|m| m.name.to_lowercase() == needle)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Append a synthesized entry unless the name is already registered.
    /// Returns true if the registry changed.
    pub fn add_synthesized(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.modules.push(Module::synthesized(name));
        true
    }

    /// Drop every module whose name matches one of `names` (case-insensitive).
    /// Returns the number of modules removed.
    pub fn remove_names(&mut self, names: &[String]) -> usize {
        let removed: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        let before = self.modules.len();
        self.modules
            .retain(|m| !removed.contains(&m.name.to_lowercase()));
        before - self.modules.len()
    }
}

/// Output of module detection. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub modules: Vec<Module>,
    /// One label from the architecture catalogue, or `"unknown"`
    pub architecture: String,
    pub entry_points: Vec<String>,
}

/// One requirement entry from a delta-spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaEntry {
    /// e.g. `REQ-SERVICES-020`
    pub id: String,
    /// Lowercased module token from the id, e.g. `services`
    pub module: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeltaSpec {
    pub added: Vec<DeltaEntry>,
    pub modified: Vec<DeltaEntry>,
    pub removed: Vec<DeltaEntry>,
}

impl DeltaSpec {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// All entries in section order: added, modified, removed
    pub fn entries(&self) -> impl Iterator<Item = &DeltaEntry> {
        self.added
            .iter()
            .chain(self.modified.iter())
            .chain(self.removed.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Created,
    Updated,
    Deprecated,
}

impl FileAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAction::Created => "created",
            FileAction::Updated => "updated",
            FileAction::Deprecated => "deprecated",
        }
    }
}

/// Audit record returned by every write operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Path relative to the project root
    pub path: String,
    pub action: FileAction,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, action: FileAction) -> Self {
        Self {
            path: path.into(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ModuleRegistry {
        ModuleRegistry::new(vec![
            Module::new("Auth", "Auth module", vec!["src/auth/**".to_string()]),
            Module::new("services", "Services", vec!["src/services/**".to_string()]),
        ])
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let reg = registry();
        assert_eq!(reg.find("auth").map(|m| m.name.as_str()), Some("Auth"));
        assert!(reg.find("billing").is_none());
    }

    #[test]
    fn test_add_synthesized_skips_existing() {
        let mut reg = registry();
        assert!(!reg.add_synthesized("AUTH"));
        assert!(reg.add_synthesized("billing"));

        let billing = reg.find("billing").unwrap();
        assert_eq!(billing.description, "billing module");
        assert_eq!(billing.paths, vec!["src/billing/**"]);
        assert_eq!(billing.keywords, vec!["billing"]);
    }

    #[test]
    fn test_remove_names() {
        let mut reg = registry();
        assert_eq!(reg.remove_names(&["auth".to_string()]), 1);
        assert_eq!(reg.modules.len(), 1);
        assert_eq!(reg.modules[0].name, "services");
    }

    #[test]
    fn test_registry_yaml_round_trip() {
        let mut reg = registry();
        reg.modules[0].relationships.depends_on.push("services".to_string());
        reg.modules[1].relationships.used_by.push("Auth".to_string());

        let yaml = serde_yaml::to_string(&reg).unwrap();
        let back: ModuleRegistry = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, reg);
    }

    #[test]
    fn test_registry_defaults_optional_fields() {
        let yaml = "modules:\n  - name: core\n    paths:\n      - src/core/**\n";
        let reg: ModuleRegistry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(reg.modules[0].description, "");
        assert!(reg.modules[0].keywords.is_empty());
        assert!(reg.modules[0].relationships.depends_on.is_empty());
    }
}
