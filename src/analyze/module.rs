//! Module boundary detection for the knowledge base.
//!
//! Detection runs in a fixed order:
//! 1. A persisted registry, when present, wins outright
//! 2. Files are grouped by top-level directory (looking through `src`, `app`,
//!    `lib`, `packages`)
//! 3. The architecture pattern is classified
//! 4. Keywords are generated from names and paths
//! 5. Candidates sharing a name are merged
//! 6. Relationships are inferred from imports
//! 7. Entry points are collected

use std::collections::HashMap;

use super::architecture::{detect_architecture_pattern, detect_entry_points};
use super::relationships::{detect_relationships, dedup_in_place, module_files, SourceReader};
use crate::error::{KnowlensError, Result};
use crate::types::{DetectionResult, Module, ModuleRegistry, Relationships};

/// Minimum number of files for a directory to become a module on its own
const MIN_GROUP_FILES: usize = 2;

/// Top-level directories that hold modules rather than being one
const MODULE_CONTAINERS: &[&str] = &["src", "app", "lib", "packages"];

/// Directory names that are kept as modules even with a single file
const MODULE_INDICATORS: &[&str] = &[
    "src",
    "lib",
    "app",
    "packages",
    "modules",
    "features",
    "components",
    "pages",
    "routes",
    "services",
    "models",
    "controllers",
    "views",
    "domain",
    "application",
    "infrastructure",
    "api",
    "core",
    "shared",
    "utils",
    "helpers",
    "types",
    "config",
    "middleware",
    "plugins",
    "cli",
    "commands",
];

/// Minimum keyword length for name parts and path segments
const MIN_KEYWORD_LEN: usize = 3;

/// Detect modules, architecture and entry points for a scanned file list.
///
/// When `registry` is given its modules are returned verbatim; architecture
/// and entry points are still computed from `files`.
pub fn detect_modules(
    files: &[String],
    sources: &dyn SourceReader,
    registry: Option<&ModuleRegistry>,
) -> Result<DetectionResult> {
    let architecture = detect_architecture_pattern(files);
    let entry_points = detect_entry_points(files);

    if let Some(registry) = registry {
        tracing::debug!(
            modules = registry.modules.len(),
            "using persisted module registry"
        );
        return Ok(DetectionResult {
            modules: registry.modules.clone(),
            architecture,
            entry_points,
        });
    }

    let candidates: Vec<Module> = group_by_directory(files)
        .into_iter()
        .map(|mut m| {
            m.keywords = generate_keywords(&m.name, &m.paths);
            m
        })
        .collect();

    let mut modules = resolve_conflicts(candidates);

    detect_relationships(&mut modules, files, sources).map_err(|e| match e {
        KnowlensError::ModuleDetection(_) => e,
        other => KnowlensError::ModuleDetection(other.to_string()),
    })?;

    tracing::debug!(
        modules = modules.len(),
        architecture = %architecture,
        "module detection finished"
    );

    Ok(DetectionResult {
        modules,
        architecture,
        entry_points,
    })
}

/// Group files into candidate modules by directory, in first-seen order
pub fn group_by_directory(files: &[String]) -> Vec<Module> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for file in files {
        let parts: Vec<&str> = file.split('/').collect();
        if parts.len() < 2 {
            continue;
        }

        let name = if MODULE_CONTAINERS.contains(&parts[0]) && parts.len() >= 3 {
            parts[1]
        } else {
            parts[0]
        };

        let group = groups.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            Vec::new()
        });
        group.push(file.clone());
    }

    order
        .into_iter()
        .filter_map(|name| {
            let paths = groups.remove(&name)?;
            if paths.len() < MIN_GROUP_FILES && !MODULE_INDICATORS.contains(&name.as_str()) {
                return None;
            }
            let glob = format!("{}/**", infer_base_path(&paths));
            Some(Module::new(&name, &infer_description(&name), vec![glob]))
        })
        .collect()
}

/// Lowercased name, name parts split on camelCase/kebab/snake boundaries,
/// and path segments from the module's globs
pub fn generate_keywords(name: &str, paths: &[String]) -> Vec<String> {
    let mut keywords = vec![name.to_lowercase()];

    for part in split_name(name) {
        if part.chars().count() >= MIN_KEYWORD_LEN {
            keywords.push(part);
        }
    }

    for path in paths {
        for segment in path.split('/') {
            if segment == "**" || segment == "*" {
                continue;
            }
            if segment.chars().count() >= MIN_KEYWORD_LEN && !segment.contains('.') {
                keywords.push(segment.to_lowercase());
            }
        }
    }

    dedup_in_place(&mut keywords);
    keywords
}

/// `apiMiddleware` / `api-middleware` / `api_middleware` → `["api", "middleware"]`
fn split_name(name: &str) -> Vec<String> {
    let mut hyphenated = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if let Some(p) = prev {
            if p.is_ascii_lowercase() && c.is_ascii_uppercase() {
                hyphenated.push('-');
            }
        }
        hyphenated.push(c);
        prev = Some(c);
    }

    hyphenated
        .to_lowercase()
        .split(['-', '_'])
        .map(|s| s.to_string())
        .collect()
}

/// Merge candidates sharing a name: union of path globs and keywords
pub fn resolve_conflicts(modules: Vec<Module>) -> Vec<Module> {
    let mut merged: Vec<Module> = Vec::new();

    for module in modules {
        match merged.iter_mut().find(|m| m.name == module.name) {
            Some(existing) => {
                existing.paths.extend(module.paths);
                existing.keywords.extend(module.keywords);
                dedup_in_place(&mut existing.paths);
                dedup_in_place(&mut existing.keywords);
                merge_relationships(&mut existing.relationships, module.relationships);
            }
            None => merged.push(module),
        }
    }

    merged
}

fn merge_relationships(into: &mut Relationships, from: Relationships) {
    into.depends_on.extend(from.depends_on);
    into.used_by.extend(from.used_by);
    dedup_in_place(&mut into.depends_on);
    dedup_in_place(&mut into.used_by);
}

/// Human-readable summary for well-known directory names
pub fn infer_description(name: &str) -> String {
    let description = match name {
        "cli" => "Command-line interface layer",
        "commands" => "CLI command definitions",
        "services" => "Business logic services",
        "lib" => "Shared utility functions",
        "types" => "Type definitions and schemas",
        "models" => "Data models",
        "views" => "View templates or components",
        "controllers" => "Request handlers",
        "routes" => "Route definitions",
        "middleware" => "Middleware functions",
        "config" => "Configuration management",
        "utils" => "Utility functions",
        "helpers" => "Helper functions",
        "components" => "UI components",
        "pages" => "Page components",
        "api" => "API endpoints",
        "core" => "Core application logic",
        "shared" => "Shared modules",
        "domain" => "Domain layer (business entities)",
        "application" => "Application layer (use cases)",
        "infrastructure" => "Infrastructure layer (external services)",
        "templates" => "Template files",
        "tests" => "Test files",
        "plugins" => "Plugin modules",
        "features" => "Feature modules",
        "modules" => "Application modules",
        "formatters" => "Output formatting",
        _ => return format!("{} module", name),
    };
    description.to_string()
}

/// Longest common directory prefix of a group's files.
/// A single file yields its parent directory.
fn infer_base_path(paths: &[String]) -> String {
    let Some(first) = paths.first() else {
        return String::new();
    };

    let parts: Vec<&str> = first.split('/').collect();
    if paths.len() == 1 {
        return parts[..parts.len() - 1].join("/");
    }

    let mut common = String::new();
    for i in 0..parts.len() - 1 {
        let prefix = parts[..=i].join("/");
        let with_slash = format!("{}/", prefix);
        if paths.iter().all(|p| p.starts_with(&with_slash)) {
            common = prefix;
        } else {
            break;
        }
    }

    if common.is_empty() {
        parts[0].to_string()
    } else {
        common
    }
}

/// Number of scanned files covered by a module's globs
pub fn count_module_files(module: &Module, files: &[String]) -> usize {
    module_files(module, files).len()
}
