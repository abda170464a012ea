//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{self, RefreshOptions};
use statsync::core::models::RefreshMode;
use statsync::output::OutputMode;

/// statsync - Scheduled refresh of basketball stats caches
#[derive(Parser, Debug)]
#[command(
    name = "statsync",
    version,
    about = "Scheduled refresh of basketball stats caches",
    long_about = "Rebuild per-team and per-domain stats caches one unit at a time,\n\
                  then publish whatever was produced in a single git commit.\n\n\
                  A failing unit never stops the batch; a second batch never\n\
                  runs while the first still holds the lock."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Working copy holding .statsync.toml and the artifacts
    #[arg(long, global = true, env = "STATSYNC_REPO", default_value = ".")]
    pub repo: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default .statsync.toml (30 teams plus minutes and funnels)
    Init {
        /// Overwrite an existing .statsync.toml
        #[arg(short, long)]
        force: bool,

        /// Season the caches describe (YYYY-YY)
        #[arg(short, long, default_value = "2025-26")]
        season: String,
    },

    /// Full rebuild of every (or the selected) unit, then publish
    Build {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Incremental update of every (or the selected) unit, then publish
    Update {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Commit and push the declared artifacts outside of a batch
    Publish {
        /// Commit message (defaults to a timestamped one)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show whether a batch is running and how the last one went
    Status,

    /// List declared units in run order
    Units,

    /// Ask a running batch to stop before its next unit
    Stop,

    /// Remove the run lock left by a batch that is no longer running
    Unlock,

    /// Show version
    Version,
}

/// Arguments shared by `build` and `update`
#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Unit names or glob patterns (default: all units)
    pub units: Vec<String>,

    /// Skip the publish step
    #[arg(long)]
    pub no_publish: bool,

    /// Seconds to wait between units (overrides batch.delay_secs)
    #[arg(long)]
    pub delay: Option<u64>,

    /// Remove an existing run lock before starting
    #[arg(long)]
    pub force_unlock: bool,
}

impl From<BatchArgs> for RefreshOptions {
    fn from(args: BatchArgs) -> Self {
        Self {
            selectors: args.units,
            no_publish: args.no_publish,
            delay_secs: args.delay,
            force_unlock: args.force_unlock,
        }
    }
}

/// Run the CLI, returning the process exit code
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Init { force, season }) => {
            commands::init(&cli.repo, force, &season, output_mode).map(|()| 0)
        },
        Some(Command::Build { batch }) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::refresh(&root, RefreshMode::Build, &batch.into(), output_mode)
        },
        Some(Command::Update { batch }) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::refresh(&root, RefreshMode::Update, &batch.into(), output_mode)
        },
        Some(Command::Publish { message }) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::publish(&root, message.as_deref(), output_mode)
        },
        Some(Command::Status) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::status(&root, output_mode).map(|()| 0)
        },
        Some(Command::Units) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::units(&root, output_mode).map(|()| 0)
        },
        Some(Command::Stop) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::stop(&root, output_mode).map(|()| 0)
        },
        Some(Command::Unlock) => {
            let root = commands::resolve_root(&cli.repo)?;
            commands::unlock(&root, output_mode).map(|()| 0)
        },
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("statsync v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(0)
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("statsync v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'statsync --help' for usage");
                println!("Run 'statsync init' to get started");
            }
            Ok(0)
        },
    }
}
