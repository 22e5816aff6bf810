use anyhow::Result;
use console::style;

use super::output;
use super::OutputMode;
use crate::knowledge::{generate, GenerateOptions, Workspace};
use crate::render::TemplateRenderer;

pub fn run_generate(ws: &Workspace, options: &GenerateOptions, mode: OutputMode) -> Result<()> {
    let renderer = TemplateRenderer::new()?;
    let result = generate(ws, &renderer, options)?;

    if mode.json {
        output::print_json("generate", &result);
        return Ok(());
    }
    if mode.quiet {
        return Ok(());
    }

    output::print_title("Knowledge generated");
    output::print_field("Modules", style(result.module_count).cyan());
    for module in &result.modules {
        println!(
            "  {:<20} {:>4} key files  {}",
            style(&module.name).bold(),
            module.file_count,
            style(module.keywords.join(", ")).dim()
        );
    }
    output::print_files(&result.generated_files);
    if result.dry_run {
        output::print_dry_run_notice();
    }
    Ok(())
}
