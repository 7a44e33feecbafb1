//! Config struct definition and default implementation.

use super::types::*;
use crate::parser::VerbMapping;
use crate::publisher::LookupFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a commitcards run.
///
/// This struct represents the contents of `.commitcards.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Credentials
    // =========================================================================
    /// Trello application key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Trello token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    // =========================================================================
    // Repository settings
    // =========================================================================
    /// Path to the git repository (any directory inside it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<PathBuf>,

    /// How many hours back to look when `--since` is not given.
    #[serde(default = "default_since_hours")]
    pub since_hours: u32,

    /// Upper bound on the git history query, in seconds.
    #[serde(default = "default_git_timeout_seconds")]
    pub git_timeout_seconds: u64,

    // =========================================================================
    // Board service settings
    // =========================================================================
    /// Trello API base URL (without the `/1` prefix).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for each request to the board service, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Maximum number of boards returned by a name search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// What to do when a board, card or list cannot be resolved.
    #[serde(default)]
    pub on_lookup_failure: LookupFailurePolicy,

    // =========================================================================
    // Parsing settings
    // =========================================================================
    /// Verb-to-list mapping. When present it replaces the defaults entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbs: Option<VerbMapping>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key: None,
            token: None,
            repo: None,
            since_hours: default_since_hours(),
            git_timeout_seconds: default_git_timeout_seconds(),
            api_base_url: default_api_base_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            search_limit: default_search_limit(),
            on_lookup_failure: LookupFailurePolicy::default(),
            verbs: None,
        }
    }
}
