//! # Init Command Implementation
//!
//! This module implements the `init` subcommand. Depending on where it is
//! invoked, one command covers three cases:
//!
//! - Outside any repository: create and seed a fresh rgit repository.
//! - At the root of an existing repository: idempotent reinitialization.
//! - Inside an enclosing subrepo: register the target directory as a new
//!   nested subrepo.
//!
//! The decision between those cases lives in the library's orchestrator;
//! this module only prepares the options, runs the dispatch, and reports
//! the outcome.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use semver::Version;

use rgit::backend::{GitBackend, InitOptions};
use rgit::orchestrator::{InitOutcome, OrchestratorConfig, RepoOrchestrator};
use rgit::output::OutputConfig;

/// Create an empty rgit repository or reinitialize an existing one
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize; defaults to the current working directory.
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Only print error and warning messages.
    #[arg(short, long)]
    pub quiet: bool,

    /// Create a bare repository.
    #[arg(long)]
    pub bare: bool,

    /// Directory from which templates will be used.
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Create the repository metadata at the given path instead of
    /// `./.git`, leaving a filesystem-agnostic pointer file behind.
    #[arg(long = "separate-git-dir", value_name = "PATH")]
    pub separate_git_dir: Option<PathBuf>,

    /// Share the repository amongst several users.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = ["false", "true", "umask", "group", "all", "world", "everybody"],
    )]
    pub shared: Option<String>,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, color_flag: &str) -> Result<()> {
    let output = OutputConfig::from_env_and_flags(color_flag, args.quiet);

    let directory = match args.directory {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => env::current_dir()?.join(dir),
        None => env::current_dir()?,
    };

    let version = Version::parse(env!("CARGO_PKG_VERSION"))
        .context("crate version is not valid semver")?;
    let orchestrator = RepoOrchestrator::new(Box::new(GitBackend), OrchestratorConfig::new(version));

    let options = InitOptions {
        quiet: args.quiet,
        bare: args.bare,
        template: args.template,
        separate_git_dir: args.separate_git_dir,
        shared: args.shared,
    };

    let outcome = orchestrator
        .dispatch(&directory, &options)
        .with_context(|| format!("failed to initialize {}", directory.display()))?;

    match outcome {
        InitOutcome::Initialized { root } => {
            output.success(&format!("Initialized empty rgit repository in {}", root.display()));
        }
        InitOutcome::Reinitialized { root } => {
            output.success(&format!(
                "Reinitialized existing rgit repository in {}",
                root.display()
            ));
        }
        InitOutcome::SubrepoInitialized {
            subrepo, branch, ..
        } => {
            output.success(&format!(
                "Initialized rgit subrepo {} on branch {}",
                subrepo.display(),
                branch
            ));
        }
    }

    Ok(())
}
