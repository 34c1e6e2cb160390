//! Executors for driving the scheduler in tests.

use async_trait::async_trait;
use mockall::mock;
use parking_lot::Mutex;
use std::time::Duration;

use cadence_core::{QueryDefinition, QueryExecution, QueryId, ResultEnvelope};

// Generates `MockExecutor` for expectation-style tests.
mock! {
    pub Executor {}

    #[async_trait]
    impl QueryExecution for Executor {
        async fn execute(&self, query: &QueryDefinition) -> ResultEnvelope;
    }
}

/// Records which queries ran and answers with an empty success or a fixed error
#[derive(Default)]
pub struct CountingExecutor {
    calls: Mutex<Vec<QueryId>>,
    delay: Option<Duration>,
    error: Option<String>,
}

impl CountingExecutor {
    /// Succeed immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `delay` per execution
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report `error` from every execution
    pub fn failing_with(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Total executions started
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Executions started for one query
    pub fn calls_for(&self, query_id: &QueryId) -> usize {
        self.calls.lock().iter().filter(|id| *id == query_id).count()
    }
}

#[async_trait]
impl QueryExecution for CountingExecutor {
    async fn execute(&self, query: &QueryDefinition) -> ResultEnvelope {
        self.calls.lock().push(query.id.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.error {
            Some(error) => ResultEnvelope::failure(query.id.clone(), error.clone()),
            None => ResultEnvelope::success(query.id.clone(), Vec::new()),
        }
    }
}
