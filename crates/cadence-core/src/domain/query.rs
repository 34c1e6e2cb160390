use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use super::data_source::DataSourceId;
use crate::CoreError;

/// Parameters handed to a data source, keyed by name
pub type ParameterMap = BTreeMap<String, Value>;

/// Stable query identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(pub String);

impl QueryId {
    /// Create a query id from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A named parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    /// Parameter name
    pub name: String,
    /// Parameter value
    pub value: Value,
}

impl QueryParameter {
    /// Create a parameter
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A recurring query against a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    /// Unique identifier
    pub id: QueryId,

    /// Display name
    pub name: String,

    /// Data source the query runs against
    pub data_source_id: DataSourceId,

    /// Time between executions
    #[serde(rename = "interval_ms", with = "duration_ms")]
    pub interval: Duration,

    /// Ordered parameters
    #[serde(default)]
    pub parameters: Vec<QueryParameter>,

    /// Attributes to keep in each row; empty keeps everything
    #[serde(default)]
    pub selected_attributes: Vec<String>,

    /// Whether the query should be scheduled
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Last time the query was executed
    #[serde(default)]
    pub last_executed: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl QueryDefinition {
    /// Create an active query with a freshly generated id
    pub fn new(name: impl Into<String>, data_source_id: DataSourceId, interval: Duration) -> Self {
        Self {
            id: QueryId::generate(),
            name: name.into(),
            data_source_id,
            interval,
            parameters: Vec::new(),
            selected_attributes: Vec::new(),
            is_active: true,
            last_executed: None,
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = QueryId(id.into());
        self
    }

    /// Append a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.push(QueryParameter::new(name, value));
        self
    }

    /// Set the projected attributes
    pub fn with_selected_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Parameters keyed by name. Later duplicates overwrite earlier ones.
    pub fn parameter_map(&self) -> ParameterMap {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// Check the invariants the scheduler relies on
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.0.trim().is_empty() {
            return Err(CoreError::ValidationError("query id cannot be empty".to_string()));
        }
        if self.interval.is_zero() {
            return Err(CoreError::ValidationError(format!(
                "query {} must have an interval greater than zero",
                self.id
            )));
        }

        let mut seen = HashSet::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(CoreError::ValidationError(format!(
                    "query {} repeats parameter '{}'",
                    self.id, parameter.name
                )));
            }
        }

        Ok(())
    }
}

/// Serialize a `Duration` as whole milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
