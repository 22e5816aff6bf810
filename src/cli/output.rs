use console::{style, Emoji};
use serde::Serialize;

use super::OutputMode;
use crate::emit::{ErrorOutput, JsonOutput};
use crate::error::KnowlensError;
use crate::types::{FileAction, GeneratedFile};

static SUCCESS: Emoji<'_, '_> = Emoji("✓ ", "+ ");
static FAILURE: Emoji<'_, '_> = Emoji("✗ ", "x ");
static INFO: Emoji<'_, '_> = Emoji("ℹ ", "i ");
static WARNING: Emoji<'_, '_> = Emoji("⚠ ", "! ");

pub fn print_json<T: Serialize>(command: &str, result: T) {
    println!("{}", JsonOutput::new(command, result).to_json());
}

pub fn print_title(title: &str) {
    println!();
    println!("  {}", style(title).cyan().bold());
    println!();
}

pub fn print_success(message: &str) {
    println!("  {}{}", style(SUCCESS).green(), message);
}

pub fn print_info(message: &str) {
    println!("  {}{}", style(INFO).blue(), message);
}

pub fn print_warning(message: &str) {
    println!("  {}{}", style(WARNING).yellow(), message);
}

pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<16} {}", style(label).dim(), value);
}

pub fn print_files(files: &[GeneratedFile]) {
    if files.is_empty() {
        return;
    }
    println!();
    for file in files {
        let action = match file.action {
            FileAction::Created => style(file.action.as_str()).green(),
            FileAction::Updated => style(file.action.as_str()).cyan(),
            FileAction::Deprecated => style(file.action.as_str()).yellow(),
        };
        println!("  {}{:<11} {}", style(SUCCESS).green(), action, file.path);
    }
}

pub fn print_dry_run_notice() {
    println!();
    print_info("Dry run: nothing was written");
}

/// Report a failed command on stderr (stdout in JSON mode)
pub fn print_error(err: &anyhow::Error, mode: OutputMode) {
    match err.downcast_ref::<KnowlensError>() {
        Some(known) if mode.json => println!("{}", ErrorOutput::from(known).to_json()),
        Some(known) => {
            eprintln!(
                "  {}{} {}",
                style(FAILURE).red(),
                style(format!("[{}]", known.code())).red().bold(),
                known
            );
            eprintln!("    {}", style(known.suggestion()).dim());
        }
        None if mode.json => println!(
            "{}",
            serde_json::json!({ "error": { "code": "UNEXPECTED_ERROR", "message": format!("{:#}", err) } })
        ),
        None => eprintln!("  {}{:#}", style(FAILURE).red(), err),
    }
}
