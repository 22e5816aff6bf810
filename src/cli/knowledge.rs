use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::output;
use super::OutputMode;
use crate::knowledge::{init_knowledge, InitOptions, KnowledgeInitResult, Workspace};
use crate::render::TemplateRenderer;

pub fn run_knowledge_init(ws: &Workspace, options: &InitOptions, mode: OutputMode) -> Result<()> {
    let renderer = TemplateRenderer::new()?;

    let pb = if mode.json || mode.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Scanning {}...", ws.root.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = init_knowledge(ws, &renderer, options);
    pb.finish_and_clear();
    let result = result?;

    if mode.json {
        output::print_json("knowledge-init", &result);
    } else if !mode.quiet {
        print_summary(&result);
    }
    Ok(())
}

fn print_summary(result: &KnowledgeInitResult) {
    let stack = &result.tech_stack;
    output::print_title("Knowledge base initialized");
    output::print_field("Files scanned", style(result.total_files).green());
    output::print_field("Scan depth", result.scan_depth);
    output::print_field(
        "Language",
        style(stack.language.as_deref().unwrap_or("unknown")).cyan(),
    );
    if let Some(framework) = &stack.framework {
        output::print_field("Framework", style(framework).cyan());
    }
    output::print_field("Dependencies", result.dependencies.len());
    if !result.entry_points.is_empty() {
        output::print_field("Entry points", result.entry_points.join(", "));
    }
    if !result.config_files.is_empty() {
        output::print_field("Config files", result.config_files.join(", "));
    }

    output::print_files(&result.generated_files);
    if result.dry_run {
        output::print_dry_run_notice();
    }
}
