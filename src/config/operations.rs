//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::{DEFAULT_CONFIG_FILE, KEY_ENV, TOKEN_ENV};
use crate::board::TrelloSettings;
use crate::error::{CardsError, Result};
use crate::parser::VerbMapping;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(CardsError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CardsError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the config for a run.
    ///
    /// An explicit path must exist. Without one, `.commitcards.yaml` in `cwd`
    /// is used if present, and the defaults otherwise.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = cwd.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| CardsError::ConfigError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override credentials from `TRELLO_KEY` / `TRELLO_TOKEN` when set.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Override credentials from an arbitrary variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.key = Some(key);
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.token = Some(token);
        }
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `since_hours`, `git_timeout_seconds`, `request_timeout_seconds` and
    ///   `search_limit` must be positive
    /// - `verbs` keys must be single non-empty words, values non-empty
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("since_hours", u64::from(self.since_hours)),
            ("git_timeout_seconds", self.git_timeout_seconds),
            ("request_timeout_seconds", self.request_timeout_seconds),
            ("search_limit", u64::from(self.search_limit)),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(CardsError::ConfigError(format!(
                    "config validation failed: {} must be greater than 0",
                    name
                )));
            }
        }

        if self.api_base_url.trim().is_empty() {
            return Err(CardsError::ConfigError(
                "config validation failed: api_base_url must not be empty".to_string(),
            ));
        }

        if let Some(verbs) = &self.verbs {
            validate_verbs(verbs)?;
        }

        Ok(())
    }

    /// The verb mapping to parse with: the configured one, or the defaults.
    pub fn verb_mapping(&self) -> VerbMapping {
        self.verbs.clone().unwrap_or_default()
    }

    /// Default "since" timestamp relative to `now`.
    pub fn default_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::hours(i64::from(self.since_hours))
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_seconds)
    }

    /// Connection settings for the Trello client.
    pub fn trello_settings(&self) -> TrelloSettings {
        TrelloSettings {
            base_url: self.api_base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
            search_limit: self.search_limit,
        }
    }
}

/// Check that every verb is one non-empty token and maps to a non-empty list.
pub(crate) fn validate_verbs(verbs: &VerbMapping) -> Result<()> {
    for (verb, list) in verbs.iter() {
        if verb.is_empty() || verb.contains(char::is_whitespace) {
            return Err(CardsError::ConfigError(format!(
                "config validation failed: verb '{}' must be a single word",
                verb
            )));
        }
        if list.trim().is_empty() {
            return Err(CardsError::ConfigError(format!(
                "config validation failed: verb '{}' maps to an empty list name",
                verb
            )));
        }
    }
    Ok(())
}
