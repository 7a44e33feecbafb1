//! Exit code constants for the commitcards CLI.
//!
//! - 0: Success
//! - 1: Configuration error (credentials, repository, config file, arguments)
//! - 2: Authorization failure (the board service rejected the token)
//! - 3: Git operation failure
//! - 4: Remote service failure (transport, unexpected response)
//! - 5: Lookup failure (board, card or list could not be resolved)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: missing credentials, missing repository, bad arguments.
pub const CONFIG_ERROR: i32 = 1;

/// Authorization failure: the token was rejected and must be refreshed.
pub const AUTH_FAILURE: i32 = 2;

/// Git operation failure: log query failed or timed out.
pub const GIT_FAILURE: i32 = 3;

/// Remote failure: the board service could not be reached or answered unexpectedly.
pub const REMOTE_FAILURE: i32 = 4;

/// Lookup failure: a board, card or list could not be resolved under fail-fast.
pub const LOOKUP_FAILURE: i32 = 5;
