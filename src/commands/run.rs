//! Implementation of the `commitcards run` command.
//!
//! Loads recent commits, parses their messages, checks the credentials and
//! publishes every directive to Trello.

use super::{repo_path, since, verb_mapping};
use crate::board::TrelloClient;
use crate::cli::RunArgs;
use crate::commits::CommitLoader;
use crate::config::Config;
use crate::error::Result;
use crate::parser::MessageParser;
use crate::pipeline;
use crate::publisher::{LookupFailurePolicy, PublishReport, Publisher};
use chrono::Utc;
use tracing::info;

/// Execute the `commitcards run` command.
///
/// Credentials are layered as `--key`/`--token` over `TRELLO_KEY`/`TRELLO_TOKEN`
/// over the config file. Missing credentials fail before git is queried.
pub fn cmd_run(mut config: Config, args: RunArgs) -> Result<PublishReport> {
    config.apply_env();
    if let Some(key) = args.key {
        config.key = Some(key);
    }
    if let Some(token) = args.token {
        config.token = Some(token);
    }
    if args.fail_fast {
        config.on_lookup_failure = LookupFailurePolicy::FailFast;
    }

    let client = TrelloClient::new(
        config.key.as_deref().unwrap_or_default(),
        config.token.as_deref().unwrap_or_default(),
        config.trello_settings(),
    )?;

    let parser = MessageParser::new(verb_mapping(&config, &args.source.verbs)?);
    let repo = repo_path(&config, &args.source);
    let since = since(&config, args.source.since, Utc::now());

    let mut loader = CommitLoader::new(config.git_timeout());
    let collected = pipeline::load_directives(&mut loader, repo.as_deref(), Some(since), &parser)?;

    if collected.directives.is_empty() {
        println!("No card directives in commits since {}", since.to_rfc3339());
        return Ok(PublishReport::default());
    }

    client.authorize()?;

    let report = Publisher::new(&client, config.on_lookup_failure).publish(&collected.directives)?;
    info!(
        comments = report.comments,
        moves = report.moves,
        skipped = report.skipped.len(),
        "Run complete"
    );

    println!(
        "Posted {} comment(s), moved {} card(s), skipped {} directive(s)",
        report.comments,
        report.moves,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!(
            "  r{} {} card {}: {}",
            skipped.revision, skipped.board, skipped.card_id, skipped.reason
        );
    }
    if !collected.skipped.is_empty() {
        println!(
            "Ignored {} malformed line(s); run `commitcards preview` for details",
            collected.skipped.len()
        );
    }

    Ok(report)
}
