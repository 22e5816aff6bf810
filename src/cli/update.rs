use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::output;
use super::OutputMode;
use crate::delta::{identify_affected_modules, parse_delta_spec};
use crate::error::KnowlensError;
use crate::knowledge::{update, KnowledgeUpdateResult, UpdateMode, Workspace};
use crate::render::TemplateRenderer;
use crate::types::DeltaSpec;

pub fn run_update(ws: &Workspace, mode: &UpdateMode, output_mode: OutputMode) -> Result<()> {
    let renderer = TemplateRenderer::new()?;
    let result = update(ws, &renderer, mode)?;

    if output_mode.json {
        output::print_json("update", &result);
    } else if !output_mode.quiet {
        print_update_summary(&result);
    }
    Ok(())
}

fn print_update_summary(result: &KnowledgeUpdateResult) {
    output::print_title("Knowledge updated");
    if result.generated_files.is_empty() {
        output::print_info("Nothing to update");
        return;
    }
    for (label, names) in [
        ("Created", &result.created),
        ("Updated", &result.updated),
        ("Deprecated", &result.deprecated),
    ] {
        if !names.is_empty() {
            output::print_field(label, names.join(", "));
        }
    }
    output::print_files(&result.generated_files);
}

#[derive(Serialize)]
struct DeltaReport {
    #[serde(flatten)]
    delta: DeltaSpec,
    affected_modules: Vec<String>,
}

/// Parse a delta-spec and report its entries and the modules they touch
pub fn run_delta(ws: &Workspace, file: &Path, mode: OutputMode) -> Result<()> {
    let bytes = std::fs::read(file).map_err(|e| KnowlensError::read(file, e))?;
    let delta = parse_delta_spec(&String::from_utf8_lossy(&bytes));
    let affected_modules = identify_affected_modules(&delta, &ws.paths.registry());
    let report = DeltaReport {
        delta,
        affected_modules,
    };

    if mode.json {
        output::print_json("delta", &report);
        return Ok(());
    }
    if mode.quiet {
        return Ok(());
    }

    output::print_title("Delta-spec");
    if report.delta.is_empty() {
        output::print_warning("No requirement entries found");
        return Ok(());
    }
    for (label, entries) in [
        ("ADDED", &report.delta.added),
        ("MODIFIED", &report.delta.modified),
        ("REMOVED", &report.delta.removed),
    ] {
        for entry in entries {
            println!("  {:<9} {:<24} {}", label, entry.id, entry.description);
        }
    }
    println!();
    output::print_field("Affected", report.affected_modules.join(", "));
    Ok(())
}
