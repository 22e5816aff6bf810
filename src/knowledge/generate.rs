use serde::Serialize;

use super::docs::{collect_key_files, write_index, write_module_doc, IndexRow, ModuleStatus};
use super::Workspace;
use crate::error::Result;
use crate::render::Renderer;
use crate::types::GeneratedFile;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedModule {
    pub name: String,
    pub description: String,
    /// Key files listed in the module document
    pub file_count: usize,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeResult {
    pub module_count: usize,
    pub modules: Vec<GeneratedModule>,
    pub generated_files: Vec<GeneratedFile>,
    pub dry_run: bool,
}

/// Regenerate every registered module's document and the knowledge index.
/// Requires the registry written by `steer`.
pub fn generate(
    ws: &Workspace,
    renderer: &dyn Renderer,
    options: &GenerateOptions,
) -> Result<KnowledgeResult> {
    let registry = ws.registry().load()?;

    let mut modules = Vec::with_capacity(registry.modules.len());
    let mut generated_files = Vec::new();

    for module in &registry.modules {
        let key_files = collect_key_files(ws, module)?;
        tracing::debug!(module = %module.name, files = key_files.len(), "collected key files");

        if !options.dry_run {
            generated_files.push(write_module_doc(ws, renderer, module, &key_files)?);
        }

        modules.push(GeneratedModule {
            name: module.name.clone(),
            description: module.description.clone(),
            file_count: key_files.len(),
            keywords: module.keywords.clone(),
        });
    }

    if !options.dry_run {
        let rows: Vec<IndexRow> = registry
            .modules
            .iter()
            .map(|m| IndexRow::from_module(m, ModuleStatus::Active))
            .collect();
        generated_files.push(write_index(ws, renderer, &rows)?);
    }

    Ok(KnowledgeResult {
        module_count: modules.len(),
        modules,
        generated_files,
        dry_run: options.dry_run,
    })
}
