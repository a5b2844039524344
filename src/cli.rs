//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// rgit - Nested subrepos on top of git
#[derive(Parser, Debug)]
#[command(name = "rgit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty rgit repository, reinitialize an existing one, or
    /// register a nested subrepo inside an enclosing one
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let level = self
            .log_level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Warn);
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()
            .ok();

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &self.color),
        }
    }
}
