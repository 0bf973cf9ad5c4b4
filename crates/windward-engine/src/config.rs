//! Engine configuration.
//!
//! The canonical configuration lives in a YAML file deployed next to the
//! server (and mirrored to the client bundle so both reconcilers agree on
//! tick tuning). This module defines the strongly-typed struct and a
//! loader; every field has a default matching the shipped game tuning, so
//! an empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Tuning parameters for the progression engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Milliseconds per production tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Minimum elapsed milliseconds before a reconcile pass does anything;
    /// below this, repeated calls are exact no-ops.
    #[serde(default = "default_min_progress_ms")]
    pub min_progress_ms: u64,

    /// Experience granted when a drawn captain is already owned.
    #[serde(default = "default_duplicate_captain_xp")]
    pub duplicate_captain_xp: u64,

    /// Diamonds charged per recruitment pull.
    #[serde(default = "default_pull_cost_diamonds")]
    pub pull_cost_diamonds: u64,

    /// Fragments charged per recruitment pull.
    #[serde(default = "default_pull_cost_fragments")]
    pub pull_cost_fragments: u64,

    /// Number of pulls in a multi-pull batch.
    #[serde(default = "default_multi_pull_count")]
    pub multi_pull_count: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            min_progress_ms: default_min_progress_ms(),
            duplicate_captain_xp: default_duplicate_captain_xp(),
            pull_cost_diamonds: default_pull_cost_diamonds(),
            pull_cost_fragments: default_pull_cost_fragments(),
            multi_pull_count: default_multi_pull_count(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    8_000
}

const fn default_min_progress_ms() -> u64 {
    1_000
}

const fn default_duplicate_captain_xp() -> u64 {
    50
}

const fn default_pull_cost_diamonds() -> u64 {
    100
}

const fn default_pull_cost_fragments() -> u64 {
    10
}

const fn default_multi_pull_count() -> u32 {
    10
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_shipped_tuning() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_interval_ms, 8_000);
        assert_eq!(config.min_progress_ms, 1_000);
        assert_eq!(config.duplicate_captain_xp, 50);
        assert_eq!(config.pull_cost_diamonds, 100);
        assert_eq!(config.pull_cost_fragments, 10);
        assert_eq!(config.multi_pull_count, 10);
    }

    #[test]
    fn parse_empty_yaml_uses_defaults() {
        let config = EngineConfig::parse("{}");
        assert_eq!(config.ok(), Some(EngineConfig::default()));
    }

    #[test]
    fn parse_overrides_selected_fields() {
        let config = EngineConfig::parse("tick_interval_ms: 4000\npull_cost_diamonds: 250\n");
        let config = config.unwrap();
        assert_eq!(config.tick_interval_ms, 4_000);
        assert_eq!(config.pull_cost_diamonds, 250);
        // Everything else keeps its default.
        assert_eq!(config.min_progress_ms, 1_000);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(EngineConfig::parse(":[").is_err());
    }
}
