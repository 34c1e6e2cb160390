//! Fake data sources.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use cadence_core::{CoreError, DataSource, ParameterMap, Row};

/// Returns fixed rows and records every parameter map it receives
#[derive(Default)]
pub struct RecordingDataSource {
    rows: Vec<Row>,
    latency: Option<Duration>,
    calls: Mutex<Vec<ParameterMap>>,
}

impl RecordingDataSource {
    /// Serve `rows` on every call
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Sleep before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Parameter maps received so far, oldest first
    pub fn calls(&self) -> Vec<ParameterMap> {
        self.calls.lock().clone()
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl DataSource for RecordingDataSource {
    async fn query_rows(&self, parameters: &ParameterMap) -> Result<Vec<Row>, CoreError> {
        self.calls.lock().push(parameters.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.rows.clone())
    }
}

/// Fails every call with the given message
pub struct FailingDataSource {
    message: String,
}

impl FailingDataSource {
    /// Fail with `message`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DataSource for FailingDataSource {
    async fn query_rows(&self, _parameters: &ParameterMap) -> Result<Vec<Row>, CoreError> {
        Err(CoreError::DataSourceError(self.message.clone()))
    }
}

/// Panics on every call
pub struct PanickingDataSource;

#[async_trait]
impl DataSource for PanickingDataSource {
    async fn query_rows(&self, _parameters: &ParameterMap) -> Result<Vec<Row>, CoreError> {
        panic!("data source exploded")
    }
}
