//! Turning loaded commits into directives.
//!
//! Every call builds a fresh [`Collected`]; nothing is carried over between
//! runs apart from the repository remembered by the [`CommitLoader`].

use crate::commits::{CommitLoader, CommitRecord};
use crate::error::Result;
use crate::parser::{CommentDirective, LineError, LineOutcome, MessageParser};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info};

/// A commit message line that was malformed and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub revision: u64,
    pub author: String,
    /// 1-based line number within the commit message.
    pub line_no: usize,
    pub line: String,
    pub reason: LineError,
}

/// Directives and skipped lines gathered from a batch of commits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collected {
    /// Directives in commit order, then line order.
    pub directives: Vec<CommentDirective>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse each commit's message and attach author and revision to its directives.
pub fn collect_directives(commits: &[CommitRecord], parser: &MessageParser) -> Collected {
    let mut collected = Collected::default();

    for commit in commits {
        let parsed = parser.parse_message(&commit.message);

        for (line_no, line, reason) in parsed.skipped() {
            info!(
                revision = commit.revision,
                line = line_no,
                %reason,
                "Skipping line: {}",
                line
            );
            collected.skipped.push(SkippedLine {
                revision: commit.revision,
                author: commit.author.clone(),
                line_no,
                line: line.to_string(),
                reason: reason.clone(),
            });
        }

        if let Some(LineOutcome::Stopped { line_no, .. }) = parsed.outcomes.last() {
            debug!(
                revision = commit.revision,
                line = line_no,
                "No card reference, ignoring rest of message"
            );
        }

        collected.directives.extend(
            parsed
                .into_directives()
                .into_iter()
                .map(|directive| directive.attach(commit)),
        );
    }

    info!(
        commits = commits.len(),
        directives = collected.directives.len(),
        skipped = collected.skipped.len(),
        "Parsed commit messages"
    );
    collected
}

/// Load commits after `since` and parse them.
pub fn load_directives(
    loader: &mut CommitLoader,
    repo: Option<&Path>,
    since: Option<DateTime<Utc>>,
    parser: &MessageParser,
) -> Result<Collected> {
    let commits = loader.load_since(repo, since)?;
    Ok(collect_directives(&commits, parser))
}
