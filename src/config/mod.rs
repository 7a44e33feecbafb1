//! Configuration model for commitcards.
//!
//! This module defines the Config struct that represents `.commitcards.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, validation of config values, and
//! layering of environment variables and command-line overrides on top.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::Config;
pub(crate) use operations::validate_verbs;
pub use types::{DEFAULT_CONFIG_FILE, KEY_ENV, TOKEN_ENV};
