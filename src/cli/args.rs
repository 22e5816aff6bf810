use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "knowlens")]
#[command(about = "Build and maintain an AI-readable knowledge base for a codebase", long_about = None)]
#[command(version)]
pub struct Args {
    /// Project root
    #[arg(short, long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create .knowlens.toml in the project root
    Init {
        /// Project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Detect modules and write module-map.yaml and architecture.md
    Steer {
        /// Show what would be detected without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Ignore an existing module-map.yaml and detect from scratch
        #[arg(long)]
        fresh: bool,
    },

    /// Generate every module README and the knowledge index from module-map.yaml
    Generate {
        /// Show what would be generated without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Update module docs from a delta-spec or for selected modules
    #[command(group(ArgGroup::new("source").required(true).args(["delta", "modules"])))]
    Update {
        /// Delta-spec with ADDED/MODIFIED/REMOVED requirement sections
        #[arg(long)]
        delta: Option<PathBuf>,

        /// Comma-separated module names to regenerate
        #[arg(long, value_delimiter = ',')]
        modules: Vec<String>,
    },

    /// Parse a delta-spec and list the modules it affects
    Delta {
        /// Delta-spec file
        file: PathBuf,
    },

    /// Knowledge base maintenance
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeCommand {
    /// Scan the project and write raw-scan.md plus the index and conventions skeletons
    Init {
        /// Show what would be scanned without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Maximum scan depth (defaults to scan.depth from .knowlens.toml)
        #[arg(long)]
        depth: Option<usize>,
    },
}

/// How command results are presented
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
}

impl Args {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "knowlens=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_update_modules_split_on_commas() {
        let args = Args::parse_from(["knowlens", "update", "--modules", "auth,services"]);
        match args.command {
            Command::Update { delta, modules } => {
                assert!(delta.is_none());
                assert_eq!(modules, vec!["auth", "services"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_requires_a_source() {
        assert!(Args::try_parse_from(["knowlens", "update"]).is_err());
        assert!(Args::try_parse_from([
            "knowlens", "update", "--delta", "d.md", "--modules", "auth"
        ])
        .is_err());
    }

    #[test]
    fn test_knowledge_init_flags() {
        let args = Args::parse_from(["knowlens", "knowledge", "init", "--depth", "3", "--dry-run"]);
        match args.command {
            Command::Knowledge {
                command: KnowledgeCommand::Init { dry_run, depth },
            } => {
                assert!(dry_run);
                assert_eq!(depth, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Args::try_parse_from(["knowlens", "knowledge"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["knowlens", "steer", "--path", "/tmp/x", "--json"]);
        assert_eq!(args.path, PathBuf::from("/tmp/x"));
        assert!(args.output_mode().json);
        assert_eq!(args.log_filter(), "warn");
    }
}
