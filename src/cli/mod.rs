//! CLI argument parsing for commitcards.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

static RELATIVE_SINCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*([mhd])$").expect("Invalid relative duration regex")
});

/// Commitcards: post commit message directives as comments on Trello cards.
///
/// A commit message line such as `testing Web Site card 12 fixed the header`
/// comments on card #12 of the "Web Site" board and moves it to the list
/// mapped to the verb `testing`.
#[derive(Parser, Debug)]
#[command(name = "commitcards")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to use instead of `.commitcards.yaml` in the current directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for commitcards.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Post comments for recent commits.
    ///
    /// Loads commits since the given time, parses their messages, checks the
    /// credentials, then comments on (and optionally moves) each referenced card.
    Run(RunArgs),

    /// Show what a run would post, without contacting Trello.
    Preview(PreviewArgs),

    /// Print the effective verb-to-list mapping.
    Verbs(VerbsArgs),
}

/// Where to read commits from and how to parse them.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path inside the git repository to read.
    #[arg(long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Only commits after this time: RFC 3339 timestamp or relative (90m, 2h, 3d).
    #[arg(long, value_name = "TIME", value_parser = parse_since)]
    pub since: Option<SinceArg>,

    #[command(flatten)]
    pub verbs: VerbArgs,
}

/// Verb table overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct VerbArgs {
    /// Verb mapping entry `verb=List Name`. Repeatable; replaces the configured table.
    #[arg(long = "verb", value_name = "VERB=LIST", value_parser = parse_verb)]
    pub verbs: Vec<(String, String)>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Trello application key (overrides TRELLO_KEY and the config file).
    #[arg(long)]
    pub key: Option<String>,

    /// Trello token (overrides TRELLO_TOKEN and the config file).
    #[arg(long)]
    pub token: Option<String>,

    /// Abort on the first board, card or list that cannot be found.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the `preview` command.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the `verbs` command.
#[derive(Args, Debug)]
pub struct VerbsArgs {
    #[command(flatten)]
    pub verbs: VerbArgs,
}

/// A `--since` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinceArg {
    /// An absolute point in time.
    At(DateTime<Utc>),
    /// A span before the moment of the run.
    Ago(Duration),
}

impl SinceArg {
    /// The absolute timestamp this argument denotes relative to `now`.
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            SinceArg::At(at) => at,
            SinceArg::Ago(span) => now - span,
        }
    }
}

fn parse_since(value: &str) -> Result<SinceArg, String> {
    let value = value.trim();

    if let Some(caps) = RELATIVE_SINCE_REGEX.captures(value) {
        let amount: i64 = caps[1]
            .parse()
            .map_err(|_| format!("duration '{}' is too large", value))?;
        let span = match &caps[2] {
            "m" => Duration::try_minutes(amount),
            "h" => Duration::try_hours(amount),
            _ => Duration::try_days(amount),
        };
        return span
            .map(SinceArg::Ago)
            .ok_or_else(|| format!("duration '{}' is too large", value));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|at| SinceArg::At(at.with_timezone(&Utc)))
        .map_err(|_| {
            format!(
                "'{}' is neither an RFC 3339 timestamp nor a duration like 90m, 2h or 3d",
                value
            )
        })
}

fn parse_verb(value: &str) -> Result<(String, String), String> {
    let (verb, list) = value
        .split_once('=')
        .ok_or_else(|| format!("expected VERB=LIST, got '{}'", value))?;

    let verb = verb.trim();
    let list = list.trim();
    if verb.is_empty() || verb.contains(char::is_whitespace) {
        return Err(format!("verb '{}' must be a single word", verb));
    }
    if list.is_empty() {
        return Err(format!("verb '{}' maps to an empty list name", verb));
    }

    Ok((verb.to_string(), list.to_string()))
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
