//! Process configuration
//!
//! Combines scheduler and monitoring settings. Values come from defaults,
//! then a YAML file if one is given, then environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

use cadence_core::{CoreError, SchedulerConfig};
use cadence_monitoring::MonitoringConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Scheduler and result store settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl CadenceConfig {
    /// Load from environment variables on top of the defaults
    pub fn load() -> Result<Self, CoreError> {
        let mut config = Self {
            scheduler: SchedulerConfig::load()?,
            monitoring: MonitoringConfig::default(),
        };
        config.apply_monitoring_env();
        Ok(config)
    }

    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.scheduler.validate()?;
        Ok(config)
    }

    /// Read a YAML file, then apply environment overrides for logging
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigurationError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml_str(&yaml)?;
        config.apply_monitoring_env();
        Ok(config)
    }

    fn apply_monitoring_env(&mut self) {
        if let Ok(filter) = env::var("CADENCE_LOG_FILTER") {
            self.monitoring.log_filter = filter;
        }

        if let Ok(json) = env::var("CADENCE_LOG_JSON") {
            match json.parse::<bool>() {
                Ok(json) => self.monitoring.enable_json_logging = json,
                Err(_) => warn!("Invalid CADENCE_LOG_JSON value: {}", json),
            }
        }

        if let Ok(log_file) = env::var("CADENCE_LOG_FILE") {
            self.monitoring.log_file = Some(log_file);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::OverlapPolicy;

    #[test]
    fn test_yaml_sections() {
        let config = CadenceConfig::from_yaml_str(
            r#"
scheduler:
  history_capacity: 10
  overlap_policy: skip_if_running
monitoring:
  log_filter: debug
  enable_json_logging: true
"#,
        )
        .unwrap();

        assert_eq!(config.scheduler.history_capacity, 10);
        assert_eq!(config.scheduler.overlap_policy, OverlapPolicy::SkipIfRunning);
        assert_eq!(config.monitoring.log_filter, "debug");
        assert!(config.monitoring.enable_json_logging);
        assert_eq!(config.monitoring.service_name, "cadence");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = CadenceConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CadenceConfig::default());
    }

    #[test]
    fn test_invalid_capacity_is_rejected() {
        let err = CadenceConfig::from_yaml_str("scheduler:\n  history_capacity: 0\n").unwrap_err();
        assert!(matches!(err, CoreError::ConfigurationError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CadenceConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, CoreError::ConfigurationError(_)));
    }
}
