//! Collaborator traits for the Cadence core
//!
//! The core only depends on these interfaces. `cadence-state-inmemory`
//! provides the in-process implementations; other crates can implement
//! them to back queries and data sources with something else.

use async_trait::async_trait;
use std::collections::HashMap;

use super::data_source::{DataSourceDescriptor, DataSourceId};
use super::query::{ParameterMap, QueryDefinition, QueryId};
use super::result::{ResultEnvelope, Row};
use crate::CoreError;

/// Lookup of data source descriptors. Read-only from the core's perspective.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSourceRegistry: Send + Sync {
    /// Find a descriptor by ID
    async fn find_by_id(&self, id: &DataSourceId) -> Result<Option<DataSourceDescriptor>, CoreError>;

    /// List every registered descriptor
    async fn list(&self) -> Result<Vec<DataSourceDescriptor>, CoreError>;
}

/// An external provider of rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch rows for the given parameters
    async fn query_rows(&self, parameters: &ParameterMap) -> Result<Vec<Row>, CoreError>;
}

/// Bounded, newest-first history of results per query.
///
/// Implementations must be safe under concurrent writers and readers, and
/// `store_result` is the only way entries are added.
pub trait ResultStore: Send + Sync {
    /// Prepend an envelope to its query's history, evicting the oldest entry when full
    fn store_result(&self, envelope: ResultEnvelope);

    /// Most recent envelope, or `None` if the query never executed
    fn latest_result(&self, query_id: &QueryId) -> Option<ResultEnvelope>;

    /// Full history, newest first
    fn query_results(&self, query_id: &QueryId) -> Vec<ResultEnvelope>;

    /// Snapshot of every history
    fn all_results(&self) -> HashMap<QueryId, Vec<ResultEnvelope>>;

    /// Number of envelopes retained for a query
    fn result_count(&self, query_id: &QueryId) -> usize {
        self.query_results(query_id).len()
    }

    /// Drop one query's history
    fn clear_query_results(&self, query_id: &QueryId);

    /// Drop every history
    fn clear_all_results(&self);
}

/// Persistence for query definitions
#[async_trait]
pub trait QueryRepository: Send + Sync {
    /// Find a query by ID
    async fn find_by_id(&self, id: &QueryId) -> Result<Option<QueryDefinition>, CoreError>;

    /// List every query
    async fn find_all(&self) -> Result<Vec<QueryDefinition>, CoreError>;

    /// List queries that should be scheduled
    async fn find_active(&self) -> Result<Vec<QueryDefinition>, CoreError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|q| q.is_active)
            .collect())
    }

    /// Insert or replace a query
    async fn save(&self, query: &QueryDefinition) -> Result<(), CoreError>;

    /// Delete a query; fails with `QueryNotFound` if it does not exist
    async fn delete(&self, id: &QueryId) -> Result<(), CoreError>;
}
