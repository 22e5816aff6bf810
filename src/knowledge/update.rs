//! Incremental knowledge base updates.
//!
//! In delta mode the ADDED and MODIFIED entries of a delta-spec regenerate
//! their module documents, REMOVED entries get a deprecation banner, and the
//! registry is brought in line afterwards. Manual mode regenerates an explicit
//! list of modules. Both finish by rebuilding the knowledge index.
//!
//! Modules are processed one at a time in delta order. The first failure stops
//! the run; documents already written stay written.

use serde::Serialize;
use std::path::PathBuf;

use super::docs::{collect_key_files, write_index, write_module_doc, IndexRow, ModuleStatus};
use super::Workspace;
use crate::config::{validate_module_name, REGISTRY_FILENAME};
use crate::delta::parse_delta_spec;
use crate::emit::{atomic_write, read_existing};
use crate::error::{KnowlensError, Result};
use crate::registry::RegistryStore;
use crate::render::Renderer;
use crate::types::{FileAction, GeneratedFile, Module, ModuleRegistry};

/// Prefix identifying a deprecated module document
pub const DEPRECATION_MARKER: &str = "> **DEPRECATED**";

#[derive(Debug, Clone)]
pub enum UpdateMode {
    /// Path to a delta-spec document
    Delta(PathBuf),
    /// Module names to regenerate
    Manual(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeUpdateResult {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deprecated: Vec<String>,
    pub generated_files: Vec<GeneratedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeprecationOutcome {
    /// Banner prepended
    Marked(GeneratedFile),
    /// Banner was already present; nothing written
    AlreadyDeprecated(GeneratedFile),
    /// No document to deprecate
    Missing,
}

pub fn update(
    ws: &Workspace,
    renderer: &dyn Renderer,
    mode: &UpdateMode,
) -> Result<KnowledgeUpdateResult> {
    let store = ws.registry();
    let registry = store.load_lenient();
    let mut result = KnowledgeUpdateResult::default();
    let mut removed: Vec<String> = Vec::new();

    match mode {
        UpdateMode::Delta(path) => {
            let bytes = std::fs::read(path).map_err(|e| KnowlensError::read(path, e))?;
            let delta = parse_delta_spec(&String::from_utf8_lossy(&bytes));
            tracing::debug!(
                added = delta.added.len(),
                modified = delta.modified.len(),
                removed = delta.removed.len(),
                "parsed delta-spec"
            );

            for entry in &delta.added {
                let module = resolve_module(registry.as_ref(), &entry.module);
                let file = update_module_doc(ws, renderer, &module)?;
                match file.action {
                    FileAction::Created => push_unique(&mut result.created, &module.name),
                    _ => push_unique(&mut result.updated, &module.name),
                }
                result.generated_files.push(file);
            }

            for entry in &delta.modified {
                let module = resolve_module(registry.as_ref(), &entry.module);
                let file = update_module_doc(ws, renderer, &module)?;
                if !result.created.contains(&module.name) {
                    push_unique(&mut result.updated, &module.name);
                }
                result.generated_files.push(file);
            }

            for entry in &delta.removed {
                let name = registry
                    .as_ref()
                    .and_then(|r| r.find(&entry.module))
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| entry.module.clone());
                push_unique(&mut removed, &name);

                match mark_module_deprecated(ws, &name, &entry.description)? {
                    DeprecationOutcome::Marked(file) | DeprecationOutcome::AlreadyDeprecated(file) => {
                        push_unique(&mut result.deprecated, &name);
                        result.generated_files.push(file);
                    }
                    DeprecationOutcome::Missing => {
                        tracing::debug!(module = %name, "no module document to deprecate");
                    }
                }
            }

            let mut added: Vec<String> = Vec::new();
            for entry in &delta.added {
                push_unique(&mut added, &entry.module);
            }
            if !added.is_empty() || !removed.is_empty() {
                if let Some(file) = update_registry(ws, &store, &added, &removed)? {
                    result.generated_files.push(file);
                }
            }
        }
        UpdateMode::Manual(names) => {
            for name in names {
                validate_module_name(name)?;
            }
            for name in names {
                let module = resolve_module(registry.as_ref(), name);
                let file = update_module_doc(ws, renderer, &module)?;
                match file.action {
                    FileAction::Created => push_unique(&mut result.created, &module.name),
                    _ => push_unique(&mut result.updated, &module.name),
                }
                result.generated_files.push(file);
            }
        }
    }

    // With a registry the index always mirrors it, even when it is now empty
    match store.load_lenient() {
        Some(registry) => {
            let rows = registry_rows(&registry, &removed);
            result.generated_files.push(write_index(ws, renderer, &rows)?);
        }
        None => {
            let rows = fallback_rows(&result);
            if !rows.is_empty() {
                result.generated_files.push(write_index(ws, renderer, &rows)?);
            }
        }
    }

    Ok(result)
}

/// Registered module matching `name`, or a synthesized `src/<name>/**` entry
fn resolve_module(registry: Option<&ModuleRegistry>, name: &str) -> Module {
    registry
        .and_then(|r| r.find(name))
        .cloned()
        .unwrap_or_else(|| Module::synthesized(name))
}

fn update_module_doc(
    ws: &Workspace,
    renderer: &dyn Renderer,
    module: &Module,
) -> Result<GeneratedFile> {
    let key_files = collect_key_files(ws, module)?;
    write_module_doc(ws, renderer, module, &key_files)
}

/// Prepend a deprecation banner to a module's document. The document is
/// never deleted; an existing banner is left alone.
pub fn mark_module_deprecated(
    ws: &Workspace,
    module: &str,
    reason: &str,
) -> Result<DeprecationOutcome> {
    validate_module_name(module)?;
    let path = ws.paths.module_doc(module);
    let Some(content) = read_existing(&path)? else {
        return Ok(DeprecationOutcome::Missing);
    };

    let file = GeneratedFile::new(ws.paths.relative_module_doc(module), FileAction::Deprecated);
    if content.contains(DEPRECATION_MARKER) {
        return Ok(DeprecationOutcome::AlreadyDeprecated(file));
    }

    let banner = format!(
        "{}: This module was removed. Reason: {}\n\n",
        DEPRECATION_MARKER, reason
    );
    atomic_write(&path, &format!("{}{}", banner, content))?;
    tracing::info!(module = %module, "marked module deprecated");

    Ok(DeprecationOutcome::Marked(file))
}

/// Append newly added modules and drop removed ones. Skipped when no
/// registry exists yet.
fn update_registry(
    ws: &Workspace,
    store: &RegistryStore,
    added: &[String],
    removed: &[String],
) -> Result<Option<GeneratedFile>> {
    let Some(mut registry) = store.load_optional()? else {
        tracing::debug!("no registry, skipping registry update");
        return Ok(None);
    };

    for name in added {
        registry.add_synthesized(name);
    }
    registry.remove_names(removed);
    store.save(&registry)?;

    Ok(Some(GeneratedFile::new(
        ws.paths.relative(REGISTRY_FILENAME),
        FileAction::Updated,
    )))
}

/// Index rows in registry order; modules removed in this run are Deprecated
fn registry_rows(registry: &ModuleRegistry, removed: &[String]) -> Vec<IndexRow> {
    registry
        .modules
        .iter()
        .map(|m| {
            let status = if removed.iter().any(|r| r.eq_ignore_ascii_case(&m.name)) {
                ModuleStatus::Deprecated
            } else {
                ModuleStatus::Active
            };
            IndexRow::from_module(m, status)
        })
        .collect()
}

/// Index rows built from this run alone, used when no registry exists
fn fallback_rows(result: &KnowledgeUpdateResult) -> Vec<IndexRow> {
    let active = result
        .created
        .iter()
        .chain(&result.updated)
        .map(|name| IndexRow::from_module(&Module::synthesized(name), ModuleStatus::Active));
    let deprecated = result
        .deprecated
        .iter()
        .map(|name| IndexRow::from_module(&Module::synthesized(name), ModuleStatus::Deprecated));
    active.chain(deprecated).collect()
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}
