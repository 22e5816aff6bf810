use serde::Serialize;
use serde_json::json;
use std::collections::BTreeSet;

use super::docs::write_merged;
use super::Workspace;
use crate::analyze::{count_module_files, detect_modules, ProjectSources};
use crate::config::{ARCHITECTURE_FILENAME, REGISTRY_FILENAME};
use crate::error::Result;
use crate::render::{Renderer, ARCHITECTURE};
use crate::scan::scan_directory;
use crate::types::{FileAction, GeneratedFile, ModuleRegistry, Relationships};

/// Directory levels shown in the architecture document
const TREE_DEPTH: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct SteerOptions {
    pub dry_run: bool,
    /// Ignore an existing registry and detect from scratch
    pub fresh: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub description: String,
    pub file_count: usize,
    pub keywords: Vec<String>,
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Serialize)]
pub struct SteeringResult {
    pub file_count: usize,
    pub module_count: usize,
    pub architecture: String,
    pub entry_points: Vec<String>,
    pub modules: Vec<ModuleSummary>,
    pub generated_files: Vec<GeneratedFile>,
    pub dry_run: bool,
}

/// Scan the project, detect modules and write the registry and architecture document
pub fn steer(
    ws: &Workspace,
    renderer: &dyn Renderer,
    options: &SteerOptions,
) -> Result<SteeringResult> {
    let scanned = scan_directory(&ws.root, &["**".to_string()], &ws.scan_options())?;
    tracing::debug!(files = scanned.count, "scanned project");

    let store = ws.registry();
    let existing = if options.fresh {
        None
    } else {
        store.load_lenient()
    };

    let sources = ProjectSources::new(&ws.root);
    let detection = detect_modules(&scanned.files, &sources, existing.as_ref())?;

    let modules: Vec<ModuleSummary> = detection
        .modules
        .iter()
        .map(|m| ModuleSummary {
            name: m.name.clone(),
            description: m.description.clone(),
            file_count: count_module_files(m, &scanned.files),
            keywords: m.keywords.clone(),
            relationships: m.relationships.clone(),
        })
        .collect();

    let mut generated_files = Vec::new();

    if !options.dry_run {
        let action = if store.exists() {
            FileAction::Updated
        } else {
            FileAction::Created
        };
        store.save(&ModuleRegistry::new(detection.modules.clone()))?;
        generated_files.push(GeneratedFile::new(ws.paths.relative(REGISTRY_FILENAME), action));

        let context = json!({
            "project_name": ws.config.project.name,
            "architecture": detection.architecture,
            "module_count": modules.len(),
            "file_count": scanned.count,
            "entry_points": detection.entry_points,
            "directory_tree": build_directory_tree(&scanned.files, TREE_DEPTH),
            "modules": detection.modules.iter().zip(&modules).map(|(m, s)| json!({
                "name": m.name,
                "description": m.description,
                "path": m.paths.first().cloned().unwrap_or_else(|| format!("{}/**", m.name)),
                "file_count": s.file_count,
                "relationships": m.relationships,
            })).collect::<Vec<_>>(),
        });
        let fresh = renderer.render(ARCHITECTURE, &context)?;
        let action = write_merged(&ws.paths.architecture(), &fresh)?;
        generated_files.push(GeneratedFile::new(
            ws.paths.relative(ARCHITECTURE_FILENAME),
            action,
        ));
    }

    Ok(SteeringResult {
        file_count: scanned.count,
        module_count: modules.len(),
        architecture: detection.architecture,
        entry_points: detection.entry_points,
        modules,
        generated_files,
        dry_run: options.dry_run,
    })
}

/// Indented listing of the first `max_depth` directory levels
pub fn build_directory_tree(files: &[String], max_depth: usize) -> String {
    let mut dirs: BTreeSet<String> = BTreeSet::new();

    for file in files {
        let parts: Vec<&str> = file.split('/').collect();
        let levels = parts.len().saturating_sub(1).min(max_depth);
        for i in 1..=levels {
            dirs.insert(parts[..i].join("/"));
        }
    }

    dirs.iter()
        .map(|dir| {
            let depth = dir.matches('/').count();
            let name = dir.rsplit('/').next().unwrap_or(dir);
            format!("{}{}/", "  ".repeat(depth), name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
