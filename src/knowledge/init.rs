//! Knowledge base bootstrap.
//!
//! `raw-scan.md` is rewritten on every run. The `_index.md` and
//! `_conventions.md` skeletons are only created when missing, and module
//! documents are never touched.

use serde::Serialize;
use serde_json::json;

use super::steer::build_directory_tree;
use super::Workspace;
use crate::analyze::{
    collect_config_files, collect_dependencies, detect_entry_points, detect_tech_stack,
    manifest_entry_points, Dependency, TechStack,
};
use crate::config::{
    config_path, CONFIG_FILENAME, CONVENTIONS_FILENAME, INDEX_FILENAME, RAW_SCAN_FILENAME,
};
use crate::emit::{atomic_write, ensure_dir};
use crate::error::Result;
use crate::render::{Renderer, CONVENTIONS, KNOWLEDGE_INDEX, RAW_SCAN};
use crate::scan::{scan_directory, ScanOptions};
use crate::types::{FileAction, GeneratedFile};

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub dry_run: bool,
    /// Scan depth; the configured depth when unset
    pub depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeInitResult {
    pub total_files: usize,
    pub scan_depth: usize,
    pub tech_stack: TechStack,
    pub entry_points: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub config_files: Vec<String>,
    pub generated_files: Vec<GeneratedFile>,
    pub dry_run: bool,
}

/// Scan the project and write `raw-scan.md` plus the index and conventions skeletons
pub fn init_knowledge(
    ws: &Workspace,
    renderer: &dyn Renderer,
    options: &InitOptions,
) -> Result<KnowledgeInitResult> {
    let depth = options.depth.unwrap_or(ws.config.scan.depth);
    let scan_options = ScanOptions {
        depth,
        ..ws.scan_options()
    };
    let scanned = scan_directory(&ws.root, &["**".to_string()], &scan_options)?;
    tracing::debug!(files = scanned.count, depth, "scanned project");

    let tech_stack = detect_tech_stack(&ws.root);
    let dependencies = collect_dependencies(&ws.root);

    let mut entry_points = manifest_entry_points(&ws.root);
    for file in detect_entry_points(&scanned.files) {
        if !entry_points.contains(&file) {
            entry_points.push(file);
        }
    }

    // dotfiles never reach the scan, so the config is listed explicitly
    let mut config_files = Vec::new();
    if config_path(&ws.root).exists() {
        config_files.push(CONFIG_FILENAME.to_string());
    }
    config_files.extend(collect_config_files(&scanned.files));

    let mut generated_files = Vec::new();

    if !options.dry_run {
        ensure_dir(&ws.paths.knowledge_dir())?;

        let context = json!({
            "project_name": ws.config.project.name,
            "tech_stack": tech_stack,
            "entry_points": entry_points,
            "directory_tree": build_directory_tree(&scanned.files, depth),
            "dependencies": dependencies,
            "config_files": config_files,
            "file_stats": {
                "total_files": scanned.count,
                "scan_depth": depth,
            },
        });
        let raw_scan = ws.paths.raw_scan();
        let action = if raw_scan.exists() {
            FileAction::Updated
        } else {
            FileAction::Created
        };
        atomic_write(&raw_scan, &renderer.render(RAW_SCAN, &context)?)?;
        generated_files.push(GeneratedFile::new(ws.paths.relative(RAW_SCAN_FILENAME), action));

        let index = ws.paths.index();
        if !index.exists() {
            let context = json!({
                "project_name": ws.config.project.name,
                "knowledge_base_path": ws.paths.base,
                "modules": [],
            });
            atomic_write(&index, &renderer.render(KNOWLEDGE_INDEX, &context)?)?;
            generated_files.push(GeneratedFile::new(
                ws.paths.relative(INDEX_FILENAME),
                FileAction::Created,
            ));
        }

        let conventions = ws.paths.conventions();
        if !conventions.exists() {
            let context = json!({ "project_name": ws.config.project.name });
            atomic_write(&conventions, &renderer.render(CONVENTIONS, &context)?)?;
            generated_files.push(GeneratedFile::new(
                ws.paths.relative(CONVENTIONS_FILENAME),
                FileAction::Created,
            ));
        }

        for file in &generated_files {
            tracing::info!(path = %file.path, action = file.action.as_str(), "wrote document");
        }
    }

    Ok(KnowledgeInitResult {
        total_files: scanned.count,
        scan_depth: depth,
        tech_stack,
        entry_points,
        dependencies,
        config_files,
        generated_files,
        dry_run: options.dry_run,
    })
}
