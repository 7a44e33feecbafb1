//! Tests for config functionality.

use crate::config::{Config, DEFAULT_CONFIG_FILE, KEY_ENV, TOKEN_ENV};
use crate::error::CardsError;
use crate::publisher::LookupFailurePolicy;
use chrono::{TimeZone, Utc};
use serial_test::serial;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.key, None);
    assert_eq!(config.token, None);
    assert_eq!(config.repo, None);
    assert_eq!(config.since_hours, 1);
    assert_eq!(config.git_timeout_seconds, 60);
    assert_eq!(config.api_base_url, "https://api.trello.com");
    assert_eq!(config.request_timeout_seconds, 30);
    assert_eq!(config.search_limit, 10);
    assert_eq!(config.on_lookup_failure, LookupFailurePolicy::Skip);
    assert!(config.verbs.is_none());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config.since_hours, 1);
    assert_eq!(config.search_limit, 10);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
key: abc
since_hours: 24
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.key.as_deref(), Some("abc"));
    assert_eq!(config.since_hours, 24);

    // Unspecified values should use defaults
    assert_eq!(config.git_timeout_seconds, 60);
    assert_eq!(config.on_lookup_failure, LookupFailurePolicy::Skip);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
key: app-key
token: app-token
repo: /srv/project
since_hours: 6
git_timeout_seconds: 120
api_base_url: http://localhost:9000
request_timeout_seconds: 5
search_limit: 3
on_lookup_failure: fail_fast
verbs:
  reviewing: Code Review
  Shipped: Released
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.key.as_deref(), Some("app-key"));
    assert_eq!(config.token.as_deref(), Some("app-token"));
    assert_eq!(config.repo, Some(PathBuf::from("/srv/project")));
    assert_eq!(config.since_hours, 6);
    assert_eq!(config.git_timeout(), Duration::from_secs(120));
    assert_eq!(config.on_lookup_failure, LookupFailurePolicy::FailFast);

    let settings = config.trello_settings();
    assert_eq!(settings.base_url, "http://localhost:9000");
    assert_eq!(settings.request_timeout, Duration::from_secs(5));
    assert_eq!(settings.search_limit, 3);

    let verbs = config.verb_mapping();
    assert_eq!(verbs.len(), 2);
    assert_eq!(verbs.list_for("reviewing"), Some("Code Review"));
    assert_eq!(verbs.list_for("shipped"), Some("Released"));
}

#[test]
fn test_configured_verbs_replace_defaults() {
    let config = Config::from_yaml("verbs:\n  reviewing: Code Review\n").unwrap();
    let verbs = config.verb_mapping();
    assert_eq!(verbs.list_for("testing"), None);
}

#[test]
fn test_missing_verbs_use_defaults() {
    let config = Config::from_yaml("since_hours: 2").unwrap();
    let verbs = config.verb_mapping();
    assert_eq!(verbs.list_for("testing"), Some("Testing"));
    assert_eq!(verbs.len(), 6);
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
since_hours: 2
future_field: some_value
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.since_hours, 2);
}

#[test]
fn test_validation_zero_since_hours() {
    let err = Config::from_yaml("since_hours: 0").unwrap_err();
    assert!(matches!(err, CardsError::ConfigError(_)));
    assert!(err.to_string().contains("since_hours"));
}

#[test]
fn test_validation_zero_timeouts() {
    let err = Config::from_yaml("git_timeout_seconds: 0").unwrap_err();
    assert!(err.to_string().contains("git_timeout_seconds"));

    let err = Config::from_yaml("request_timeout_seconds: 0").unwrap_err();
    assert!(err.to_string().contains("request_timeout_seconds"));
}

#[test]
fn test_validation_verb_with_space() {
    let err = Config::from_yaml("verbs:\n  \"in review\": Review\n").unwrap_err();
    assert!(err.to_string().contains("single word"));
}

#[test]
fn test_validation_verb_with_empty_list() {
    let err = Config::from_yaml("verbs:\n  reviewing: \"\"\n").unwrap_err();
    assert!(err.to_string().contains("empty list name"));
}

#[test]
fn test_validation_verbs_colliding_by_case() {
    let err = Config::from_yaml("verbs:\n  Testing: QA\n  testing: Review\n").unwrap_err();
    assert!(matches!(err, CardsError::ConfigError(_)));
    assert!(err.to_string().contains("listed more than once"));
}

#[test]
fn test_invalid_policy_is_rejected() {
    let err = Config::from_yaml("on_lookup_failure: sometimes").unwrap_err();
    assert!(matches!(err, CardsError::ConfigError(_)));
}

#[test]
fn test_default_since() {
    let config = Config::from_yaml("since_hours: 3").unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(
        config.default_since(now),
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    );
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "search_limit: 4\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.search_limit, 4);
}

#[test]
fn test_load_missing_file() {
    let err = Config::load("/nonexistent/path/config.yaml").unwrap_err();
    assert!(matches!(err, CardsError::ConfigError(_)));
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_discover_uses_default_file_in_cwd() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILE), "since_hours: 8\n").unwrap();

    let config = Config::discover(None, temp_dir.path()).unwrap();
    assert_eq!(config.since_hours, 8);
}

#[test]
fn test_discover_without_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::discover(None, temp_dir.path()).unwrap();
    assert_eq!(config.since_hours, 1);
}

#[test]
fn test_discover_explicit_path_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.yaml");
    let err = Config::discover(Some(missing.as_path()), temp_dir.path()).unwrap_err();
    assert!(matches!(err, CardsError::ConfigError(_)));
}

#[test]
fn test_env_overrides_file_credentials() {
    let mut config = Config::from_yaml("key: file-key\ntoken: file-token\n").unwrap();
    let env: HashMap<&str, &str> = [(KEY_ENV, "env-key")].into_iter().collect();

    config.apply_env_with(|name| env.get(name).map(|v| v.to_string()));

    assert_eq!(config.key.as_deref(), Some("env-key"));
    assert_eq!(config.token.as_deref(), Some("file-token"));
}

#[test]
fn test_blank_env_values_are_ignored() {
    let mut config = Config::from_yaml("token: file-token\n").unwrap();
    config.apply_env_with(|name| (name == TOKEN_ENV).then(|| "  ".to_string()));
    assert_eq!(config.token.as_deref(), Some("file-token"));
}

#[test]
#[serial]
fn test_apply_env_reads_process_environment() {
    // SAFETY: serialized with the other environment tests.
    unsafe {
        std::env::set_var(KEY_ENV, "process-key");
        std::env::remove_var(TOKEN_ENV);
    }

    let mut config = Config::default();
    config.apply_env();

    unsafe {
        std::env::remove_var(KEY_ENV);
    }

    assert_eq!(config.key.as_deref(), Some("process-key"));
    assert_eq!(config.token, None);
}
