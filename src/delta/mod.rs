//! Delta-spec parsing.
//!
//! A delta-spec lists requirement changes under `## ADDED`, `## MODIFIED` and
//! `## REMOVED` headers, one `### REQ-<MODULE>-<NNN>: <text>` header per entry.
//! Anything else in the document is prose and ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::registry::RegistryStore;
use crate::types::{DeltaEntry, DeltaSpec};

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^##\s+(added|modified|removed)").unwrap());

static REQUIREMENT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s+(REQ-([A-Za-z0-9_-]+)-[0-9]{3}):\s*(.*)").unwrap());

#[derive(Clone, Copy)]
enum Section {
    Added,
    Modified,
    Removed,
}

/// Parse a delta-spec. Never fails: empty or malformed input yields empty lists.
pub fn parse_delta_spec(content: &str) -> DeltaSpec {
    let mut delta = DeltaSpec::default();
    let mut current: Option<Section> = None;

    for line in content.split('\n') {
        if let Some(caps) = SECTION_HEADER.captures(line) {
            current = match caps[1].to_lowercase().as_str() {
                "added" => Some(Section::Added),
                "modified" => Some(Section::Modified),
                _ => Some(Section::Removed),
            };
            continue;
        }

        let Some(section) = current else {
            continue;
        };
        let Some(caps) = REQUIREMENT_HEADER.captures(line) else {
            continue;
        };

        let entry = DeltaEntry {
            id: caps[1].to_string(),
            module: caps[2].to_lowercase(),
            description: caps[3].trim().to_string(),
        };
        match section {
            Section::Added => delta.added.push(entry),
            Section::Modified => delta.modified.push(entry),
            Section::Removed => delta.removed.push(entry),
        }
    }

    delta
}

/// Unique module names across all three lists, first occurrence first.
///
/// When the registry at `registry_path` is readable each name is replaced by
/// the registered spelling (case-insensitive exact match); otherwise the raw
/// names are returned.
pub fn identify_affected_modules(delta: &DeltaSpec, registry_path: &Path) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in delta.entries() {
        if !names.contains(&entry.module) {
            names.push(entry.module.clone());
        }
    }

    let Some(registry) = RegistryStore::new(registry_path).load_lenient() else {
        return names;
    };

    names
        .into_iter()
        .map(|name| match registry.find(&name) {
            Some(module) => module.name.clone(),
            None => name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Module, ModuleRegistry};
    use tempfile::TempDir;

    #[test]
    fn test_parse_sections() {
        let content = "# Delta\n\n## ADDED\n\n### REQ-API-MIDDLEWARE-001: add limiter\nSome prose.\n\n## Modified Requirements\n### REQ-SERVICES-020:   tighten auth   \n\n## REMOVED\n### REQ-AUTH-001: drop legacy endpoint\n";
        let delta = parse_delta_spec(content);

        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].id, "REQ-API-MIDDLEWARE-001");
        assert_eq!(delta.added[0].module, "api-middleware");
        assert_eq!(delta.added[0].description, "add limiter");

        assert_eq!(delta.modified[0].module, "services");
        assert_eq!(delta.modified[0].description, "tighten auth");

        assert_eq!(delta.removed[0].module, "auth");
        assert_eq!(delta.removed[0].description, "drop legacy endpoint");
    }

    #[test]
    fn test_single_added_entry() {
        let delta = parse_delta_spec("## ADDED\n### REQ-API-MIDDLEWARE-001: add limiter\n");
        assert_eq!(delta.added[0].module, "api-middleware");
    }

    #[test]
    fn test_requirement_before_section_ignored() {
        let delta = parse_delta_spec("### REQ-AUTH-001: orphan\n## added\n### REQ-CORE-002: kept");
        assert!(delta.removed.is_empty());
        assert_eq!(delta.added.len(), 1);
        assert_eq!(delta.added[0].module, "core");
    }

    #[test]
    fn test_malformed_requirement_ids_ignored() {
        let delta = parse_delta_spec(
            "## ADDED\n### REQ-AUTH-01: too short\n### auth: no id\n#### REQ-AUTH-001: too deep\n### REQ-AUTH-001 missing colon",
        );
        assert!(delta.is_empty());
    }

    #[test]
    fn test_parser_is_total() {
        assert!(parse_delta_spec("").is_empty());
        assert!(parse_delta_spec("   \n\n").is_empty());
        let garbage = String::from_utf8_lossy(&[0xff, 0x00, 0xfe, b'#', b'#', 0x80, b'\n', 0x01]);
        assert!(parse_delta_spec(&garbage).is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let delta = parse_delta_spec("## REMOVED\r\n### REQ-AUTH-001: drop it\r\n");
        assert_eq!(delta.removed[0].description, "drop it");
    }

    #[test]
    fn test_affected_modules_without_registry() {
        let dir = TempDir::new().unwrap();
        let delta = parse_delta_spec(
            "## ADDED\n### REQ-AUTH-001: a\n### REQ-AUTH-002: b\n## REMOVED\n### REQ-CORE-003: c",
        );

        let names = identify_affected_modules(&delta, &dir.path().join("module-map.yaml"));
        assert_eq!(names, vec!["auth", "core"]);
    }

    #[test]
    fn test_affected_modules_use_registered_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("module-map.yaml");
        RegistryStore::new(&path)
            .save(&ModuleRegistry::new(vec![Module::new(
                "Auth",
                "Authentication",
                vec!["src/auth/**".to_string()],
            )]))
            .unwrap();

        let delta = parse_delta_spec("## MODIFIED\n### REQ-AUTH-001: a\n### REQ-BILLING-001: b");
        let names = identify_affected_modules(&delta, &path);
        assert_eq!(names, vec!["Auth", "billing"]);
    }
}
