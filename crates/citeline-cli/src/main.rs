//! citeline - entity resolution and citation graph analysis
//!
//! Loads papers, citations and an affiliation reference table, resolves
//! authors, institutions and venues, ranks papers and flags citation
//! anomalies.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "citeline")]
#[command(about = "Entity resolution and citation graph analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./citeline.toml or ~/.config/citeline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve entities and analyze the citation graph
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(citeline_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, stage spinners show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    citeline_core::init_logging(
        citeline_core::Verbosity::from_flags(quiet, cli.debug),
        multi,
    )
    .context("Failed to install logger")?;

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Analyze(args) => cmd::analyze::run(args, &config, &progress),
        Command::Config => {
            cmd::config::show(&config);
            Ok(())
        }
    }
}
