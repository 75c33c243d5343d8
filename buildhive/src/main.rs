mod commands;
mod formatting;
mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "buildhive")]
#[command(about = "Change-aware build-and-release orchestrator for platform monorepos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Monorepo root holding buildhive.toml and the packages directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered sub-projects and their roles.
    Scan {
        #[arg(long, action)]
        json: bool,
    },
    /// Revert and update every sub-project, reporting conflicts and
    /// manifest changes without building.
    Sync,
    /// Reinstall dependencies for the named projects (default: all).
    Install { projects: Vec<String> },
    /// Sync, decide, and run the build pipeline for the selected platforms.
    Build {
        /// Platform names; prompts interactively when omitted.
        platforms: Vec<String>,
        /// Build every platform, concurrently and ungated.
        #[arg(long, action)]
        all: bool,
        /// Archive the aggregate tree after a successful run.
        #[arg(long, action)]
        archive: bool,
    },
    /// Aggregate each project's build output into the unified tree.
    Collect,
    /// Archive aggregate subdirectories into one ZIP.
    Archive {
        /// Directory names under the aggregate tree; prompts when omitted.
        dirs: Vec<String>,
        #[arg(long, action)]
        all: bool,
        /// Destination archive path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Upload the aggregate tree via scp.
    Deploy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    match cli.command {
        Commands::Scan { json } => commands::cmd_scan(&cli.root, json)?,
        Commands::Sync => commands::cmd_sync(&cli.root)?,
        Commands::Install { projects } => commands::cmd_install(&cli.root, projects)?,
        Commands::Build {
            platforms,
            all,
            archive,
        } => commands::cmd_build(&cli.root, platforms, all, archive)?,
        Commands::Collect => commands::cmd_collect(&cli.root)?,
        Commands::Archive { dirs, all, output } => {
            commands::cmd_archive(&cli.root, dirs, all, output)?
        }
        Commands::Deploy => commands::cmd_deploy(&cli.root)?,
    }

    Ok(())
}
