use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use cadence_monitoring::metrics::QueryMetrics;

use crate::domain::data_source::DataSourceId;
use crate::domain::query::QueryDefinition;
use crate::domain::repository::{DataSource, DataSourceRegistry, ResultStore};
use crate::domain::result::{ResultEnvelope, Row};
use crate::CoreError;

/// Error reported when a query names a data source the registry does not know
pub const DATA_SOURCE_NOT_FOUND: &str = "API not found";

/// Runs one execution of a query and records the outcome.
///
/// Implementations never fail: every problem is reported inside the
/// returned envelope, so callers have no error path to handle.
#[async_trait]
pub trait QueryExecution: Send + Sync {
    /// Execute the query, store the envelope and return it
    async fn execute(&self, query: &QueryDefinition) -> ResultEnvelope;
}

/// Routes queries to their data sources and wraps the outcome in a result envelope
pub struct QueryExecutor {
    /// Descriptor lookup
    registry: Arc<dyn DataSourceRegistry>,

    /// Where every envelope is written
    store: Arc<dyn ResultStore>,

    /// Row providers keyed by descriptor id
    data_sources: HashMap<DataSourceId, Arc<dyn DataSource>>,
}

impl QueryExecutor {
    /// Create an executor with no data sources attached
    pub fn new(registry: Arc<dyn DataSourceRegistry>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            registry,
            store,
            data_sources: HashMap::new(),
        }
    }

    /// Attach the row provider for a data source
    pub fn with_data_source(mut self, id: DataSourceId, source: Arc<dyn DataSource>) -> Self {
        self.register_data_source(id, source);
        self
    }

    /// Attach or replace the row provider for a data source
    pub fn register_data_source(&mut self, id: DataSourceId, source: Arc<dyn DataSource>) {
        if self.data_sources.insert(id.clone(), source).is_some() {
            debug!(data_source_id = %id, "Replaced data source handler");
        }
    }

    /// The store envelopes are written to
    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    /// Resolve, dispatch and project. Errors here become error envelopes.
    async fn fetch_rows(&self, query: &QueryDefinition) -> Result<Vec<Row>, CoreError> {
        let Some(descriptor) = self.registry.find_by_id(&query.data_source_id).await? else {
            debug!(
                query_id = %query.id,
                data_source_id = %query.data_source_id,
                "Data source is not registered"
            );
            return Err(CoreError::DataSourceNotFound(DATA_SOURCE_NOT_FOUND.to_string()));
        };

        let parameters = query.parameter_map();

        let Some(source) = self.data_sources.get(&descriptor.id) else {
            debug!(
                query_id = %query.id,
                data_source_id = %descriptor.id,
                "No handler for data source, reporting empty result"
            );
            return Ok(Vec::new());
        };

        let rows = source.query_rows(&parameters).await?;
        Ok(project_rows(rows, &query.selected_attributes))
    }
}

#[async_trait]
impl QueryExecution for QueryExecutor {
    async fn execute(&self, query: &QueryDefinition) -> ResultEnvelope {
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.fetch_rows(query)).catch_unwind().await;
        let envelope = match outcome {
            Ok(Ok(rows)) => ResultEnvelope::success(query.id.clone(), rows),
            Ok(Err(e)) => ResultEnvelope::failure(query.id.clone(), e.message()),
            Err(panic) => ResultEnvelope::failure(
                query.id.clone(),
                format!("data source panicked: {}", panic_message(panic.as_ref())),
            ),
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        QueryMetrics::record_execution(
            query.id.as_str(),
            query.data_source_id.as_str(),
            elapsed_ms,
            envelope.is_success(),
        );

        match &envelope.error {
            Some(error) => warn!(
                query_id = %query.id,
                data_source_id = %query.data_source_id,
                error = %error,
                "Query execution failed"
            ),
            None => debug!(
                query_id = %query.id,
                rows = envelope.data.len(),
                elapsed_ms,
                "Query executed"
            ),
        }

        self.store.store_result(envelope.clone());
        envelope
    }
}

/// Keep only the selected attributes on each row.
///
/// An empty selection keeps rows untouched. Attributes missing from a row
/// are kept as explicit nulls.
pub fn project_rows(rows: Vec<Row>, attributes: &[String]) -> Vec<Row> {
    if attributes.is_empty() {
        return rows;
    }

    rows.into_iter()
        .map(|row| {
            attributes
                .iter()
                .map(|attribute| {
                    let value = row.get(attribute).cloned().unwrap_or(Value::Null);
                    (attribute.clone(), value)
                })
                .collect()
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
