use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::output;
use super::OutputMode;
use crate::knowledge::{steer, SteerOptions, SteeringResult, Workspace};
use crate::render::TemplateRenderer;

pub fn run_steer(ws: &Workspace, options: &SteerOptions, mode: OutputMode) -> Result<()> {
    let renderer = TemplateRenderer::new()?;

    let pb = if mode.json || mode.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Scanning {}...", ws.root.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = steer(ws, &renderer, options);
    pb.finish_and_clear();
    let result = result?;

    if mode.json {
        output::print_json("steer", &result);
    } else if !mode.quiet {
        print_summary(&result);
    }
    Ok(())
}

fn print_summary(result: &SteeringResult) {
    output::print_title("Steering complete");
    output::print_field("Files scanned", style(result.file_count).green());
    output::print_field("Architecture", style(&result.architecture).cyan());
    output::print_field("Modules", style(result.module_count).cyan());
    if !result.entry_points.is_empty() {
        output::print_field("Entry points", result.entry_points.join(", "));
    }

    if !result.modules.is_empty() {
        println!();
        for module in &result.modules {
            println!(
                "  {:<20} {:>4} files  {}",
                style(&module.name).bold(),
                module.file_count,
                style(&module.description).dim()
            );
        }
    }

    output::print_files(&result.generated_files);
    if result.dry_run {
        output::print_dry_run_notice();
    }
}
