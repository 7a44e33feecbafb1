//! Git command runner for commitcards.
//!
//! Provides a wrapper around git commands with captured stdout/stderr,
//! structured error handling, and an optional bounded wait. All git
//! operations should go through this module.

use crate::error::{CardsError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_bytes(stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    fn from_output(output: &Output) -> Self {
        Self::from_bytes(&output.stdout, &output.stderr)
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(CardsError::GitError)` - On spawn failure or non-zero exit code
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = Command::new("git")
        .current_dir(cwd.as_ref())
        .args(args)
        .output()
        .map_err(|e| spawn_error(args, e))?;

    let git_output = GitOutput::from_output(&output);
    check_status(args, output.status.code(), output.status.success(), git_output)
}

/// Run a git command, killing it if it does not finish within `timeout`.
///
/// stdout and stderr are drained on background threads so a large history
/// cannot fill the pipe and stall the child while we poll.
pub fn run_git_with_timeout<P: AsRef<Path>>(
    cwd: P,
    args: &[&str],
    timeout: Duration,
) -> Result<GitOutput> {
    let mut child = Command::new("git")
        .current_dir(cwd.as_ref())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(args, e))?;

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let status = match wait_with_timeout(&mut child, timeout)? {
        Some(status) => status,
        None => {
            // Reader threads finish once the killed child's pipes close.
            let _ = join_reader(stdout_reader);
            let _ = join_reader(stderr_reader);
            return Err(CardsError::GitError(format!(
                "git {} did not finish within {} seconds",
                args.first().unwrap_or(&""),
                timeout.as_secs()
            )));
        }
    };

    let stdout = join_reader(stdout_reader);
    let stderr = join_reader(stderr_reader);
    let git_output = GitOutput::from_bytes(&stdout, &stderr);
    check_status(args, status.code(), status.success(), git_output)
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute path to the repository root
/// * `Err(CardsError::ConfigError)` - If the path is not inside a git repository
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();

    if !cwd.is_dir() {
        return Err(CardsError::ConfigError(format!(
            "repository path '{}' does not exist or is not a directory",
            cwd.display()
        )));
    }

    let output = Command::new("git")
        .current_dir(cwd)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| {
            CardsError::ConfigError(format!("failed to execute git: {} (is git installed?)", e))
        })?;

    if output.status.success() {
        let git_output = GitOutput::from_output(&output);
        Ok(PathBuf::from(git_output.stdout))
    } else {
        // "not a repository" is a setup mistake, not a git failure.
        Err(CardsError::ConfigError(format!(
            "'{}' is not inside a git repository",
            cwd.display()
        )))
    }
}

fn check_status(
    args: &[&str],
    code: Option<i32>,
    success: bool,
    git_output: GitOutput,
) -> Result<GitOutput> {
    if success {
        return Ok(git_output);
    }

    let error_msg = if git_output.stderr.is_empty() {
        git_output.stdout
    } else {
        git_output.stderr
    };

    Err(CardsError::GitError(format!(
        "git {} failed (exit code {}): {}",
        args.first().unwrap_or(&""),
        code.unwrap_or(-1),
        error_msg
    )))
}

fn spawn_error(args: &[&str], e: std::io::Error) -> CardsError {
    CardsError::GitError(format!(
        "failed to execute git {}: {}",
        args.first().unwrap_or(&""),
        e
    ))
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Wait for a child process with timeout.
///
/// Returns `None` if the process was killed because the timeout elapsed.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> Result<Option<std::process::ExitStatus>> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(20);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(CardsError::GitError(format!(
                    "failed to check git process status: {}",
                    e
                )));
            }
        }
    }
}
