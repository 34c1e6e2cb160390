//! Scheduler configuration
//!
//! Defaults can be overridden from environment variables or a YAML document.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

use crate::CoreError;

/// Default number of results retained per query
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// What to do when a timer fires while the previous execution of the same query is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Start another execution; results are stored in completion order
    #[default]
    Allow,
    /// Skip the firing and wait for the next one
    SkipIfRunning,
}

impl FromStr for OverlapPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(OverlapPolicy::Allow),
            "skip_if_running" | "skip" => Ok(OverlapPolicy::SkipIfRunning),
            other => Err(CoreError::ConfigurationError(format!(
                "unknown overlap policy: {}",
                other
            ))),
        }
    }
}

/// Scheduler and result store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of results kept per query
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Behaviour when executions of the same query would overlap
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn load() -> Result<Self, CoreError> {
        let mut config = Self::default();

        if let Ok(capacity) = env::var("CADENCE_HISTORY_CAPACITY") {
            match capacity.parse::<usize>() {
                Ok(capacity) => config.history_capacity = capacity,
                Err(_) => warn!("Invalid CADENCE_HISTORY_CAPACITY value: {}", capacity),
            }
        }

        if let Ok(policy) = env::var("CADENCE_OVERLAP_POLICY") {
            match policy.parse::<OverlapPolicy>() {
                Ok(policy) => config.overlap_policy = policy,
                Err(e) => warn!("Invalid CADENCE_OVERLAP_POLICY value: {}", e),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the store cannot honour
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.history_capacity == 0 {
            return Err(CoreError::ConfigurationError(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
