use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::query::QueryId;

/// One result row: attribute name to value
pub type Row = Map<String, Value>;

/// Outcome of a single execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Rows were produced
    Success,
    /// The execution failed; see `error`
    Error,
}

/// Uniform wrapper produced by every execution of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// Query that produced the result
    pub query_id: QueryId,

    /// When the envelope was built
    pub timestamp: DateTime<Utc>,

    /// Success or error
    pub status: ResultStatus,

    /// Rows; always empty on error
    pub data: Vec<Row>,

    /// Error message, set only on error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    /// A successful result stamped with the current time
    pub fn success(query_id: QueryId, data: Vec<Row>) -> Self {
        Self {
            query_id,
            timestamp: Utc::now(),
            status: ResultStatus::Success,
            data,
            error: None,
        }
    }

    /// A failed result stamped with the current time
    pub fn failure(query_id: QueryId, error: impl Into<String>) -> Self {
        Self {
            query_id,
            timestamp: Utc::now(),
            status: ResultStatus::Error,
            data: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Whether the execution succeeded
    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// Whether the execution failed
    pub fn is_error(&self) -> bool {
        self.status == ResultStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_has_no_rows() {
        let envelope = ResultEnvelope::failure(QueryId::new("q1"), "API not found");
        assert!(envelope.is_error());
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.error.as_deref(), Some("API not found"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let envelope = ResultEnvelope::success(QueryId::new("q1"), Vec::new());
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], json!("success"));
        assert!(value.get("error").is_none());
    }
}
