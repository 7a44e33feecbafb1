//! Configuration constants and defaults for commitcards.

use crate::board::DEFAULT_API_BASE_URL;

/// Config file looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".commitcards.yaml";

/// Environment variable holding the application key.
pub const KEY_ENV: &str = "TRELLO_KEY";

/// Environment variable holding the token.
pub const TOKEN_ENV: &str = "TRELLO_TOKEN";

// Default value functions for serde
pub(crate) fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
pub(crate) fn default_since_hours() -> u32 {
    1
}
pub(crate) fn default_git_timeout_seconds() -> u64 {
    60
}
pub(crate) fn default_request_timeout_seconds() -> u64 {
    30
}
pub(crate) fn default_search_limit() -> u32 {
    10
}
