//! Per-screen reorder configuration.
//!
//! ```toml
//! # ordview-screen.toml
//! policy = "shift_insert"
//! confirm_when_filtered = true
//!
//! [save_retry]
//! retries = 3
//! backoff = { kind = "doubling", first_ms = 50, cap_ms = 400 }
//! ```
//!
//! `ScreenConfig::default()` is swap reconciliation, confirmation under an
//! active filter, and a single save attempt.

use std::path::Path;

use ordview_reconcile::ReconcilePolicy;
use ordview_store::SaveRetry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// How filtered-view edits map onto the full order.
    pub policy: ReconcilePolicy,
    /// Ask before committing a drop made under a non-empty filter.
    pub confirm_when_filtered: bool,
    pub save_retry: SaveRetry,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::Swap,
            confirm_when_filtered: true,
            save_retry: SaveRetry::once(),
        }
    }
}

impl ScreenConfig {
    #[must_use]
    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_save_retry(mut self, save_retry: SaveRetry) -> Self {
        self.save_retry = save_retry;
        self
    }

    /// Parse and validate TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path.as_ref())?)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&std::fs::read_to_string(path.as_ref())?)
    }

    /// Every problem with the configuration; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.save_retry
            .validate()
            .into_iter()
            .map(|error| format!("save_retry: {error}"))
            .collect()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ScreenConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, ScreenConfig::default());
        assert!(config.confirm_when_filtered);
        assert_eq!(config.policy, ReconcilePolicy::Swap);
    }

    #[test]
    fn toml_sets_policy_and_retry() {
        let config = ScreenConfig::from_toml_str(
            r#"
            policy = "shift_insert"
            confirm_when_filtered = false

            [save_retry]
            retries = 3

            [save_retry.backoff]
            kind = "doubling"
            first_ms = 10
            cap_ms = 40
            "#,
        )
        .expect("valid config");
        assert_eq!(config.policy, ReconcilePolicy::ShiftInsert);
        assert!(!config.confirm_when_filtered);
        assert_eq!(
            config.save_retry,
            SaveRetry::doubling(3, 10, 40)
        );
    }

    #[test]
    fn json_is_accepted() {
        let config = ScreenConfig::from_json_str(r#"{"policy": "swap"}"#).expect("valid json");
        assert_eq!(config.policy, ReconcilePolicy::Swap);
    }

    #[test]
    fn unknown_policy_is_a_parse_error() {
        let err = ScreenConfig::from_toml_str(r#"policy = "rotate""#).expect_err("bad policy");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn inverted_backoff_fails_validation() {
        let err = ScreenConfig::from_json_str(
            r#"{"save_retry": {"retries": 1, "backoff": {"kind": "doubling", "first_ms": 100, "cap_ms": 10}}}"#,
        )
        .expect_err("invalid backoff");
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].starts_with("save_retry:"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("screen.toml");
        std::fs::write(&path, "policy = \"shift_insert\"\n").expect("write");
        let config = ScreenConfig::from_toml_file(&path).expect("load");
        assert_eq!(config.policy, ReconcilePolicy::ShiftInsert);
        assert!(matches!(
            ScreenConfig::from_toml_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
