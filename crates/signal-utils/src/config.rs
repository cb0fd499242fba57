//! Environment-variable configuration helpers
//!
//! Configuration is read through [`EnvSource`] so that loaders can be tested
//! against a plain map instead of the process environment.

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is absent or empty
    #[error("{0} not set")]
    Missing(String),

    /// A variable is present but cannot be parsed
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: String, value: String },
}

/// A source of key/value configuration
pub trait EnvSource {
    /// Look up a raw value
    fn var(&self, key: &str) -> Option<String>;

    /// Look up a value, treating empty strings as absent
    fn optional(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.trim().is_empty())
    }

    /// Look up a value that must be present
    fn required(&self, key: &str) -> Result<String, EnvError> {
        self.optional(key)
            .ok_or_else(|| EnvError::Missing(key.to_string()))
    }

    /// Look up and parse an optional value
    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, EnvError> {
        match self.optional(key) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| EnvError::Invalid {
                    key: key.to_string(),
                    value,
                }),
        }
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| (*v).to_string())
    }
}
