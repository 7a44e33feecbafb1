//! Command implementations for commitcards.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the option layering shared by them: config file,
//! then environment, then command-line flags.

mod preview;
mod run;
mod verbs;

use crate::cli::{Cli, Command, SinceArg, SourceArgs, VerbArgs};
use crate::config::{Config, validate_verbs};
use crate::error::{CardsError, Result};
use crate::parser::VerbMapping;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Run(args) => run::cmd_run(config, args).map(|_| ()),
        Command::Preview(args) => preview::cmd_preview(&config, &args),
        Command::Verbs(args) => verbs::cmd_verbs(&config, &args),
    }
}

/// Load the config file named on the command line, or the default one.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().map_err(|e| {
        CardsError::ConfigError(format!("cannot determine current directory: {}", e))
    })?;
    let config = Config::discover(explicit, &cwd)?;
    debug!(?explicit, "Loaded configuration");
    Ok(config)
}

/// Verb mapping for this invocation. `--verb` flags replace the configured table.
fn verb_mapping(config: &Config, args: &VerbArgs) -> Result<VerbMapping> {
    if args.verbs.is_empty() {
        return Ok(config.verb_mapping());
    }

    let verbs = VerbMapping::try_from_pairs(args.verbs.iter().map(|(v, l)| (v, l.clone())))
        .map_err(|e| CardsError::ConfigError(format!("invalid --verb flags: {}", e)))?;
    validate_verbs(&verbs)?;
    Ok(verbs)
}

/// Repository to read: `--repo`, else the configured one.
fn repo_path(config: &Config, source: &SourceArgs) -> Option<PathBuf> {
    source.repo.clone().or_else(|| config.repo.clone())
}

/// Lower bound for commit timestamps: `--since`, else `since_hours` before `now`.
fn since(config: &Config, arg: Option<SinceArg>, now: DateTime<Utc>) -> DateTime<Utc> {
    arg.map(|since| since.resolve(now))
        .unwrap_or_else(|| config.default_since(now))
}
