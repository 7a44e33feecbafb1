//! Commit loading from git history.
//!
//! The loader asks git for every commit whose committer date is strictly
//! after a "since" timestamp and turns each one into a [`CommitRecord`].
//! Commits come back oldest first, in the order `git log --reverse` yields
//! them; nothing here re-sorts.

use crate::error::{CardsError, Result};
use crate::git;
use chrono::{DateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// How far back to look when no "since" timestamp is given.
pub const DEFAULT_LOOKBACK_HOURS: i64 = 1;

/// Default bound on how long the history query may take.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(60);

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// A commit as read from git history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit id.
    pub sha: String,
    /// Author name.
    pub author: String,
    /// Depth of the commit in history (`git rev-list --count`).
    pub revision: u64,
    /// Committer timestamp.
    pub timestamp: DateTime<Utc>,
    /// Raw commit message, possibly multi-line.
    pub message: String,
}

/// Loads commits from a git repository.
///
/// The loader remembers the repository it last loaded from, so a later
/// call may omit the path.
#[derive(Debug, Clone)]
pub struct CommitLoader {
    repo: Option<PathBuf>,
    timeout: Duration,
}

impl Default for CommitLoader {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_TIMEOUT)
    }
}

impl CommitLoader {
    /// Create a loader with no repository established yet.
    pub fn new(timeout: Duration) -> Self {
        Self {
            repo: None,
            timeout,
        }
    }

    /// The repository root established by the last successful call, if any.
    pub fn repo(&self) -> Option<&Path> {
        self.repo.as_deref()
    }

    /// Load all commits with a committer timestamp strictly after `since`.
    ///
    /// `repo` may be omitted once a previous call has established one.
    /// `since` defaults to one hour before now.
    pub fn load_since(
        &mut self,
        repo: Option<&Path>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<CommitRecord>> {
        let root = match (repo, self.repo.as_deref()) {
            (Some(path), _) => git::get_repo_root(path)?,
            (None, Some(known)) => known.to_path_buf(),
            (None, None) => {
                return Err(CardsError::ConfigError(
                    "no repository path given and none established by an earlier run".to_string(),
                ));
            }
        };

        if self.repo.as_deref() != Some(root.as_path()) {
            info!(repo = %root.display(), "Found repository");
        }
        self.repo = Some(root.clone());

        let since =
            since.unwrap_or_else(|| Utc::now() - chrono::Duration::hours(DEFAULT_LOOKBACK_HOURS));

        if git::run_git(&root, &["rev-parse", "--verify", "--quiet", "HEAD"]).is_err() {
            info!("Repository has no commits yet");
            return Ok(Vec::new());
        }

        let since_arg = format!("--since={}", since.format("%Y-%m-%d %H:%M:%S +0000"));
        let format_arg = format!(
            "--format=%H{sep}%an{sep}%ct{sep}%B{end}",
            sep = "%x1f",
            end = "%x1e"
        );
        let output = git::run_git_with_timeout(
            &root,
            &["log", "--reverse", &since_arg, &format_arg],
            self.timeout,
        )?;

        if output.is_empty() {
            info!(since = %since, "No commits since");
            return Ok(Vec::new());
        }

        let mut commits = Vec::new();
        for raw in parse_log(&output.stdout)? {
            // git's --since is inclusive and only second-accurate.
            if raw.timestamp <= since {
                continue;
            }
            let revision = revision_of(&root, &raw.sha)?;
            debug!(revision, author = %raw.author, sha = %raw.sha, "Found commit");
            commits.push(CommitRecord {
                sha: raw.sha,
                author: raw.author,
                revision,
                timestamp: raw.timestamp,
                message: raw.message,
            });
        }

        info!(count = commits.len(), since = %since, "Loaded commits");
        Ok(commits)
    }
}

#[derive(Debug)]
struct RawCommit {
    sha: String,
    author: String,
    timestamp: DateTime<Utc>,
    message: String,
}

fn parse_log(stdout: &str) -> Result<Vec<RawCommit>> {
    stdout
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> Result<RawCommit> {
    let mut fields = record.splitn(4, FIELD_SEP);
    let (Some(sha), Some(author), Some(ct), Some(message)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CardsError::GitError(format!(
            "unexpected git log record: {:?}",
            record
        )));
    };

    let seconds: i64 = ct.trim().parse().map_err(|_| {
        CardsError::GitError(format!("invalid commit timestamp '{}' for {}", ct, sha))
    })?;
    let timestamp = Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
        CardsError::GitError(format!("commit timestamp out of range for {}", sha))
    })?;

    Ok(RawCommit {
        sha: sha.trim().to_string(),
        author: author.to_string(),
        timestamp,
        message: message.trim_end_matches(['\n', '\r']).to_string(),
    })
}

fn revision_of(root: &Path, sha: &str) -> Result<u64> {
    let output = git::run_git(root, &["rev-list", "--count", sha])?;
    output.stdout.parse().map_err(|_| {
        CardsError::GitError(format!(
            "invalid revision count '{}' for {}",
            output.stdout, sha
        ))
    })
}
