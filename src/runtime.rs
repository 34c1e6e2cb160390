//! In-process runtime
//!
//! Owns the registry, result store, executor and scheduler for one process.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use cadence_core::{
    CoreError, DataSource, DataSourceDescriptor, DataSourceId, QueryDefinition, QueryExecution,
    QueryExecutor, QueryId, QueryRepository, QueryScheduler, ResultEnvelope, ResultStore,
    SchedulerConfig,
};
use cadence_state_inmemory::{InMemoryDataSourceRegistry, InMemoryResultStore};

/// Builder for [`QueryRuntime`]
pub struct QueryRuntimeBuilder {
    config: SchedulerConfig,
    descriptors: Vec<DataSourceDescriptor>,
    sources: Vec<(DataSourceId, Arc<dyn DataSource>)>,
}

impl QueryRuntimeBuilder {
    /// Register a descriptor together with the source that serves it
    pub fn data_source(mut self, descriptor: DataSourceDescriptor, source: Arc<dyn DataSource>) -> Self {
        self.sources.push((descriptor.id.clone(), source));
        self.descriptors.push(descriptor);
        self
    }

    /// Register a descriptor with no handler. Queries against it succeed with no rows.
    pub fn descriptor(mut self, descriptor: DataSourceDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Validate the configuration and wire everything together
    pub fn build(self) -> Result<QueryRuntime, CoreError> {
        self.config.validate()?;

        let registry = Arc::new(InMemoryDataSourceRegistry::with_descriptors(self.descriptors)?);
        let store = Arc::new(InMemoryResultStore::with_capacity(self.config.history_capacity));

        let mut executor = QueryExecutor::new(registry.clone(), store.clone());
        for (id, source) in self.sources {
            executor.register_data_source(id, source);
        }
        let executor = Arc::new(executor);

        let scheduler = QueryScheduler::new(executor.clone(), self.config);

        info!(data_sources = registry.len(), "Query runtime ready");

        Ok(QueryRuntime {
            registry,
            store,
            executor,
            scheduler,
        })
    }
}

/// Scheduler, executor and in-memory state for one process
pub struct QueryRuntime {
    registry: Arc<InMemoryDataSourceRegistry>,
    store: Arc<InMemoryResultStore>,
    executor: Arc<QueryExecutor>,
    scheduler: QueryScheduler,
}

impl QueryRuntime {
    /// Start building a runtime
    pub fn builder(config: SchedulerConfig) -> QueryRuntimeBuilder {
        QueryRuntimeBuilder {
            config,
            descriptors: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn scheduler(&self) -> &QueryScheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &Arc<InMemoryResultStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<InMemoryDataSourceRegistry> {
        &self.registry
    }

    /// Run a query once, outside any schedule. The result is stored as usual.
    pub async fn execute_once(&self, query: &QueryDefinition) -> ResultEnvelope {
        self.executor.execute(query).await
    }

    /// Start scheduling a query
    pub async fn start_query(&self, query: QueryDefinition) -> Result<(), CoreError> {
        self.scheduler.start_query(query).await
    }

    /// Stop a query's schedule
    pub fn stop_query(&self, query_id: &QueryId) -> bool {
        self.scheduler.stop_query(query_id)
    }

    /// Most recent result for a query
    pub fn latest_result(&self, query_id: &QueryId) -> Option<ResultEnvelope> {
        self.store.latest_result(query_id)
    }

    /// Watch a query's latest result as it changes
    pub fn subscribe(&self, query_id: &QueryId) -> watch::Receiver<Option<ResultEnvelope>> {
        self.store.subscribe(query_id)
    }

    /// Result history for a query, newest first
    pub fn query_results(&self, query_id: &QueryId) -> Vec<ResultEnvelope> {
        self.store.query_results(query_id)
    }

    /// Schedule every active query in the repository.
    ///
    /// Invalid definitions are logged and skipped. Returns the number started.
    pub async fn start_active_queries(&self, repository: &dyn QueryRepository) -> Result<usize, CoreError> {
        let queries = repository.find_active().await?;
        let mut started = 0;

        for query in queries {
            let query_id = query.id.clone();
            match self.scheduler.start_query(query).await {
                Ok(()) => started += 1,
                Err(e) => warn!(query_id = %query_id, error = %e, "Skipping query"),
            }
        }

        info!(started, "Active queries scheduled");
        Ok(started)
    }

    /// Stop every schedule. Returns the number stopped.
    pub fn shutdown(&self) -> usize {
        let stopped = self.scheduler.stop_all_queries();
        info!(stopped, "Query runtime shut down");
        stopped
    }
}
