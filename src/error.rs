//! Error types for the commitcards CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for commitcards operations.
///
/// Each variant maps to a distinct exit code so operators can tell a
/// misconfiguration apart from an expired token or a flaky network.
#[derive(Error, Debug)]
pub enum CardsError {
    /// Missing or invalid configuration (credentials, repository, config file).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The board service rejected the credentials.
    #[error("Authorization failed: {0}. Generate a new token and try again.")]
    AuthorizationError(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// The board service could not be reached or returned an unexpected response.
    #[error("Remote request failed: {0}")]
    RemoteError(String),

    /// A board, card or list could not be resolved unambiguously.
    #[error("Lookup failed: {0}")]
    LookupError(String),
}

impl CardsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CardsError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            CardsError::AuthorizationError(_) => exit_codes::AUTH_FAILURE,
            CardsError::GitError(_) => exit_codes::GIT_FAILURE,
            CardsError::RemoteError(_) => exit_codes::REMOTE_FAILURE,
            CardsError::LookupError(_) => exit_codes::LOOKUP_FAILURE,
        }
    }
}

/// Result type alias for commitcards operations.
pub type Result<T> = std::result::Result<T, CardsError>;
