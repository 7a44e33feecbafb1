use chrono::{DateTime, Utc};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A commit to create in a throwaway repository.
pub(crate) struct TestCommit<'a> {
    pub author: &'a str,
    pub message: &'a str,
    pub at: DateTime<Utc>,
}

pub(crate) fn create_test_repo() -> TempDir {
    let temp_dir = init_repo();
    let path = temp_dir.path();

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    temp_dir
}

/// Create a repository whose history is exactly `commits`, oldest first.
pub(crate) fn create_repo_with_commits(commits: &[TestCommit<'_>]) -> TempDir {
    let temp_dir = init_repo();
    let path = temp_dir.path();

    for (i, commit) in commits.iter().enumerate() {
        std::fs::write(path.join(format!("file{}.txt", i)), format!("File {}\n", i)).unwrap();
        git(path, &["add", "."]);

        let date = commit.at.to_rfc3339();
        let author = format!("{} <{}@example.com>", commit.author, commit.author.to_lowercase());
        let output = Command::new("git")
            .current_dir(path)
            .args(["commit", "--author", &author, "-m", commit.message])
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .output()
            .unwrap_or_else(|e| panic!("failed to execute git commit: {}", e));
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    temp_dir
}

fn init_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    temp_dir
}

fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}
