//! In-memory query repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use cadence_core::{CoreError, QueryDefinition, QueryId, QueryRepository};

/// In-memory implementation of the QueryRepository
#[derive(Default, Clone)]
pub struct InMemoryQueryRepository {
    queries: Arc<RwLock<HashMap<QueryId, QueryDefinition>>>,
}

impl InMemoryQueryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with queries
    pub fn with_queries(queries: impl IntoIterator<Item = QueryDefinition>) -> Self {
        let queries = queries.into_iter().map(|q| (q.id.clone(), q)).collect();
        Self {
            queries: Arc::new(RwLock::new(queries)),
        }
    }
}

#[async_trait]
impl QueryRepository for InMemoryQueryRepository {
    async fn find_by_id(&self, id: &QueryId) -> Result<Option<QueryDefinition>, CoreError> {
        let queries = self.queries.read().await;
        Ok(queries.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<QueryDefinition>, CoreError> {
        let queries = self.queries.read().await;
        let mut all: Vec<_> = queries.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn save(&self, query: &QueryDefinition) -> Result<(), CoreError> {
        query.validate()?;
        let mut queries = self.queries.write().await;
        queries.insert(query.id.clone(), query.clone());
        debug!(query_id = %query.id, "Saved query");
        Ok(())
    }

    async fn delete(&self, id: &QueryId) -> Result<(), CoreError> {
        let mut queries = self.queries.write().await;
        queries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::QueryNotFound(id.to_string()))
    }
}
