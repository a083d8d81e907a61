//! Engine configuration
//!
//! All tunables live in one explicit record with documented defaults,
//! validated once at construction. Nothing in the engine reads hidden
//! global state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the classification and routing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum normalized confidence required to keep the argmax category.
    /// At or below this value the classification defaults to Hunch.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Sentences shorter than this (in characters, after trimming) are
    /// dropped before scoring.
    #[serde(default = "default_min_sentence_len")]
    pub min_sentence_len: usize,

    /// Optional remote scoring provider. When absent all scoring is local.
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// Remote scoring provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the provider, e.g. `http://localhost:8000`
    pub endpoint: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_remote_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_confidence_threshold() -> f32 {
    0.3
}

fn default_min_sentence_len() -> usize {
    10
}

fn default_remote_timeout_ms() -> u64 {
    5_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            min_sentence_len: default_min_sentence_len(),
            remote: None,
        }
    }
}

impl EngineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("failed to parse engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check invariants once, at construction time
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if let Some(remote) = &self.remote {
            if remote.endpoint.trim().is_empty() {
                return Err(Error::config("remote endpoint must not be empty"));
            }
            if remote.timeout_ms == 0 {
                return Err(Error::config("remote timeout_ms must be positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.confidence_threshold, 0.3);
        assert_eq!(config.min_sentence_len, 10);
        assert!(config.remote.is_none());
    }

    #[test]
    fn from_yaml_with_remote() {
        let yaml = r#"
confidence_threshold: 0.4
remote:
  endpoint: http://localhost:8000
"#;
        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.confidence_threshold, 0.4);
        assert_eq!(config.min_sentence_len, 10);
        let remote = config.remote.unwrap();
        assert_eq!(remote.endpoint, "http://localhost:8000");
        assert_eq!(remote.timeout_ms, 5_000);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = EngineConfig::from_yaml("confidence_threshold: 1.5").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_empty_endpoint() {
        let yaml = r#"
remote:
  endpoint: ""
"#;
        assert!(EngineConfig::from_yaml(yaml).is_err());
    }
}
