mod args;
mod generate;
mod init;
mod knowledge;
mod output;
mod steer;
mod update;

pub use args::{Args, Command, KnowledgeCommand, OutputMode};
pub use generate::run_generate;
pub use init::run_init;
pub use knowledge::run_knowledge_init;
pub use output::print_error;
pub use steer::run_steer;
pub use update::{run_delta, run_update};

use anyhow::Result;

use crate::knowledge::{GenerateOptions, InitOptions, SteerOptions, UpdateMode, Workspace};

/// Dispatch a parsed command line
pub fn run(args: &Args) -> Result<()> {
    let mode = args.output_mode();

    let workspace = || -> Result<Workspace> {
        let ws = Workspace::open(&args.path)?;
        tracing::debug!(root = %ws.root.display(), project = %ws.config.project.name, "loaded config");
        Ok(ws)
    };

    match &args.command {
        Command::Init { name } => run_init(&args.path, name.as_deref(), mode),
        Command::Steer { dry_run, fresh } => run_steer(
            &workspace()?,
            &SteerOptions {
                dry_run: *dry_run,
                fresh: *fresh,
            },
            mode,
        ),
        Command::Generate { dry_run } => run_generate(
            &workspace()?,
            &GenerateOptions { dry_run: *dry_run },
            mode,
        ),
        Command::Update { delta, modules } => {
            let update_mode = match delta {
                Some(path) => UpdateMode::Delta(path.clone()),
                None => UpdateMode::Manual(modules.clone()),
            };
            run_update(&workspace()?, &update_mode, mode)
        }
        Command::Delta { file } => run_delta(&workspace()?, file, mode),
        Command::Knowledge {
            command: KnowledgeCommand::Init { dry_run, depth },
        } => run_knowledge_init(
            &workspace()?,
            &InitOptions {
                dry_run: *dry_run,
                depth: *depth,
            },
            mode,
        ),
    }
}
