use thiserror::Error;

/// Core error type for the Cadence runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Query definition not found
    #[error("Query not found: {0}")]
    QueryNotFound(String),

    /// Data source descriptor not found
    #[error("Data source not found: {0}")]
    DataSourceNotFound(String),

    /// A data source failed while producing rows
    #[error("Data source error: {0}")]
    DataSourceError(String),

    /// The data source registry failed during lookup
    #[error("Registry error: {0}")]
    RegistryError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Scheduler error
    #[error("Scheduler error: {0}")]
    SchedulerError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// The message carried by the error, without the variant prefix.
    ///
    /// Result envelopes report this text verbatim.
    pub fn message(&self) -> &str {
        match self {
            CoreError::QueryNotFound(msg)
            | CoreError::DataSourceNotFound(msg)
            | CoreError::DataSourceError(msg)
            | CoreError::RegistryError(msg)
            | CoreError::ValidationError(msg)
            | CoreError::ConfigurationError(msg)
            | CoreError::SerializationError(msg)
            | CoreError::SchedulerError(msg)
            | CoreError::Other(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (CoreError::QueryNotFound("q1".to_string()), "Query not found: q1"),
            (CoreError::DataSourceNotFound("books".to_string()), "Data source not found: books"),
            (CoreError::DataSourceError("timeout".to_string()), "Data source error: timeout"),
            (CoreError::RegistryError("down".to_string()), "Registry error: down"),
            (CoreError::ValidationError("invalid".to_string()), "Validation error: invalid"),
            (CoreError::ConfigurationError("config_err".to_string()), "Configuration error: config_err"),
            (CoreError::SerializationError("ser_err".to_string()), "Serialization error: ser_err"),
            (CoreError::SchedulerError("sched".to_string()), "Scheduler error: sched"),
            (CoreError::Other("other_err".to_string()), "other_err"),
        ];

        for (error, expected_msg) in errors {
            assert_eq!(error.to_string(), expected_msg);
        }
    }

    #[test]
    fn test_message_strips_prefix() {
        let error = CoreError::DataSourceError("Service error".to_string());
        assert_eq!(error.message(), "Service error");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error: CoreError = json_error.into();

        match error {
            CoreError::SerializationError(msg) => {
                assert!(msg.contains("expected value"));
            }
            _ => panic!("Expected SerializationError variant"),
        }
    }

    #[test]
    fn test_from_str() {
        let error: CoreError = "test error message".into();
        assert_eq!(error, CoreError::Other("test error message".to_string()));
    }
}
