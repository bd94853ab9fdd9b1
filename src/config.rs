//! History configuration
//!
//! Settings applied when a container's storage is created. Views derived
//! from that storage share them.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Upper bound accepted for `initial_capacity`.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Storage configuration for one lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Label attached to log lines of this lineage (default: none)
    #[serde(default)]
    pub label: Option<String>,

    /// Number of elements storage reserves room for up front (default: 0)
    #[serde(default)]
    pub initial_capacity: usize,

    /// Whether the lineage keeps operation counters (default: true)
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            label: None,
            initial_capacity: 0,
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl HistoryConfig {
    /// Create a config with the given log label
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// Set the initial capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Turn operation counters off
    pub fn without_metrics(mut self) -> Self {
        self.metrics_enabled = false;
        self
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: HistoryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::Invalid {
                field: "initial_capacity",
                reason: format!(
                    "{} exceeds the maximum of {}",
                    self.initial_capacity, MAX_INITIAL_CAPACITY
                ),
            });
        }
        Ok(())
    }
}
