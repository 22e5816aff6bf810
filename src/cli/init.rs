use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::output;
use super::OutputMode;
use crate::config::{config_path, Config, CONFIG_FILENAME};
use crate::emit::atomic_write;
use crate::error::KnowlensError;

#[derive(Serialize)]
struct InitResult {
    config: String,
    project: String,
    knowledge_base: String,
}

pub fn run_init(root: &Path, name: Option<&str>, mode: OutputMode) -> Result<()> {
    let path = config_path(root);
    if path.exists() {
        return Err(KnowlensError::AlreadyExists(CONFIG_FILENAME.to_string()).into());
    }

    let project = match name {
        Some(name) => name.to_string(),
        None => project_name_from_dir(root),
    };
    let config = Config::new(&project);
    atomic_write(&path, &config.to_toml()?)?;
    tracing::info!(path = %path.display(), "wrote config");

    let result = InitResult {
        config: CONFIG_FILENAME.to_string(),
        project,
        knowledge_base: config.knowledge_base().to_string(),
    };

    if mode.json {
        output::print_json("init", &result);
    } else if !mode.quiet {
        output::print_success(&format!(
            "Created {} for {}",
            result.config, result.project
        ));
        output::print_info("Next: run `knowlens steer` to detect modules");
    }
    Ok(())
}

fn project_name_from_dir(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".to_string())
}
