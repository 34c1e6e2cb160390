//! Data source serving a fixed set of rows

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use cadence_core::{CoreError, DataSource, ParameterMap, Row};

/// Serves a fixed catalogue of rows.
///
/// A parameter whose name matches a row attribute filters rows by equality
/// (strings compare case-insensitively). Other parameters are ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    rows: Vec<Row>,
    latency: Option<Duration>,
}

impl StaticDataSource {
    /// Serve the given rows
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, latency: None }
    }

    /// Build from JSON objects; non-object values are rejected
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Result<Self, CoreError> {
        let rows = values
            .into_iter()
            .map(|value| match value {
                Value::Object(row) => Ok(row),
                other => Err(CoreError::ValidationError(format!(
                    "static rows must be JSON objects, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rows))
    }

    /// Delay every response, simulating a remote source
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn matches(row: &Row, parameters: &ParameterMap) -> bool {
        parameters.iter().all(|(name, expected)| match row.get(name) {
            None => true,
            Some(Value::String(actual)) => expected
                .as_str()
                .is_some_and(|expected| actual.eq_ignore_ascii_case(expected)),
            Some(actual) => actual == expected,
        })
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn query_rows(&self, parameters: &ParameterMap) -> Result<Vec<Row>, CoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self
            .rows
            .iter()
            .filter(|row| Self::matches(row, parameters))
            .cloned()
            .collect())
    }
}
