use serde::Serialize;
use serde_json::json;
use std::path::Path;

use super::Workspace;
use crate::config::{validate_module_name, INDEX_FILENAME};
use crate::emit::{atomic_write, read_existing};
use crate::error::Result;
use crate::merge::merge_content;
use crate::render::{Renderer, KNOWLEDGE_INDEX, MODULE_README};
use crate::scan::scan_directory;
use crate::types::{FileAction, GeneratedFile, Module};

/// Number of files listed in a module document
pub const MAX_KEY_FILES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyFile {
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleStatus {
    Active,
    Deprecated,
}

/// One row of the knowledge index module table
#[derive(Debug, Clone, Serialize)]
pub(crate) struct IndexRow {
    pub name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub depends_on: Vec<String>,
    pub status: ModuleStatus,
}

impl IndexRow {
    pub fn from_module(module: &Module, status: ModuleStatus) -> Self {
        Self {
            name: module.name.clone(),
            description: module.description.clone(),
            keywords: module.keywords.clone(),
            depends_on: module.relationships.depends_on.clone(),
            status,
        }
    }
}

/// Short description of a file from its name and extension
pub fn infer_file_description(path: &str) -> &'static str {
    let basename = path.rsplit('/').next().unwrap_or(path);

    if matches!(basename, "index.ts" | "index.js") {
        return "Module entry point";
    }
    if matches!(basename, "mod.rs" | "lib.rs") {
        return "Module root";
    }
    if basename == "main.rs" {
        return "Binary entry point";
    }

    const SUFFIXES: &[(&str, &str)] = &[
        (".test.ts", "Test file"),
        (".spec.ts", "Test file"),
        (".service.ts", "Service implementation"),
        (".controller.ts", "Controller implementation"),
        (".model.ts", "Data model"),
        (".schema.ts", "Schema definition"),
        (".dto.ts", "Data transfer object"),
        (".middleware.ts", "Middleware function"),
        (".guard.ts", "Guard implementation"),
        (".pipe.ts", "Pipe implementation"),
        (".config.ts", "Configuration"),
        (".types.ts", "Type definitions"),
        (".utils.ts", "Utility functions"),
        (".hbs", "Handlebars template"),
    ];
    if let Some((_, description)) = SUFFIXES.iter().find(|(s, _)| basename.ends_with(s)) {
        return *description;
    }

    let extension = Path::new(basename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    match extension {
        "ts" => "TypeScript source",
        "js" => "JavaScript source",
        "tsx" | "jsx" => "React component",
        "vue" => "Vue component",
        "py" => "Python source",
        "go" => "Go source",
        "rs" => "Rust source",
        "md" => "Documentation",
        "yaml" | "yml" => "YAML configuration",
        "json" => "JSON configuration",
        "toml" => "TOML configuration",
        "css" => "Stylesheet",
        "scss" => "SCSS stylesheet",
        "html" => "HTML template",
        _ => "Source file",
    }
}

/// First [`MAX_KEY_FILES`] files under the module's globs, in scan order
pub(crate) fn collect_key_files(ws: &Workspace, module: &Module) -> Result<Vec<KeyFile>> {
    let patterns = if module.paths.is_empty() {
        vec![format!("{}/**", module.name)]
    } else {
        module.paths.clone()
    };

    let scanned = scan_directory(&ws.root, &patterns, &ws.scan_options())?;
    Ok(scanned
        .files
        .into_iter()
        .take(MAX_KEY_FILES)
        .map(|path| {
            let description = infer_file_description(&path).to_string();
            KeyFile { path, description }
        })
        .collect())
}

/// Render a module's document and merge it with the existing one
pub(crate) fn write_module_doc(
    ws: &Workspace,
    renderer: &dyn Renderer,
    module: &Module,
    key_files: &[KeyFile],
) -> Result<GeneratedFile> {
    validate_module_name(&module.name)?;
    let context = json!({
        "module_name": module.name,
        "description": module.description,
        "path": module.paths.first().cloned().unwrap_or_else(|| module.name.clone()),
        "keywords": module.keywords,
        "relationships": module.relationships,
        "key_files": key_files,
    });
    let fresh = renderer.render(MODULE_README, &context)?;

    let action = write_merged(&ws.paths.module_doc(&module.name), &fresh)?;
    Ok(GeneratedFile::new(
        ws.paths.relative_module_doc(&module.name),
        action,
    ))
}

/// Render the knowledge index and merge it with the existing one
pub(crate) fn write_index(
    ws: &Workspace,
    renderer: &dyn Renderer,
    rows: &[IndexRow],
) -> Result<GeneratedFile> {
    let context = json!({
        "project_name": ws.config.project.name,
        "knowledge_base_path": ws.paths.base,
        "modules": rows,
    });
    let fresh = renderer.render(KNOWLEDGE_INDEX, &context)?;

    let action = write_merged(&ws.paths.index(), &fresh)?;
    Ok(GeneratedFile::new(ws.paths.relative(INDEX_FILENAME), action))
}

/// Merge `fresh` into the document at `path` (if any) and write it atomically
pub(crate) fn write_merged(path: &Path, fresh: &str) -> Result<FileAction> {
    let (content, action) = match read_existing(path)? {
        Some(existing) => (merge_content(fresh, &existing), FileAction::Updated),
        None => (fresh.to_string(), FileAction::Created),
    };

    atomic_write(path, &content)?;
    tracing::info!(path = %path.display(), action = action.as_str(), "wrote document");
    Ok(action)
}
