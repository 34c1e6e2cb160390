//! Bounded per-query result history

use dashmap::DashMap;
use std::collections::{HashMap, VecDeque};
use tokio::sync::watch;
use tracing::{debug, trace};

use cadence_core::{QueryId, ResultEnvelope, ResultStore, DEFAULT_HISTORY_CAPACITY};

/// Results for one query plus the channel that publishes its latest result
#[derive(Default)]
struct QueryHistory {
    results: VecDeque<ResultEnvelope>,
    latest: Option<watch::Sender<Option<ResultEnvelope>>>,
}

impl QueryHistory {
    fn publish(&self) {
        if let Some(latest) = &self.latest {
            latest.send_replace(self.results.front().cloned());
        }
    }

    fn has_subscribers(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|latest| latest.receiver_count() > 0)
    }
}

/// Concurrent result store keeping the newest `capacity` envelopes per query.
///
/// Each write locks only its query's shard entry, so the prepend and the
/// truncation happen as one step and readers never see a partial history.
/// Subscribers are notified under the same lock, in store order.
pub struct InMemoryResultStore {
    capacity: usize,
    histories: DashMap<QueryId, QueryHistory>,
}

impl InMemoryResultStore {
    /// Create a store with the default capacity of 100 per query
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a store keeping at most `capacity` envelopes per query (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            histories: DashMap::with_capacity(16),
        }
    }

    /// Per-query bound
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Watch a query's latest result.
    ///
    /// The receiver starts at the current latest result (`None` if there is
    /// none) and sees every later store or clear.
    pub fn subscribe(&self, query_id: &QueryId) -> watch::Receiver<Option<ResultEnvelope>> {
        let mut history = self.histories.entry(query_id.clone()).or_default();
        if let Some(latest) = &history.latest {
            return latest.subscribe();
        }

        let (latest, receiver) = watch::channel(history.results.front().cloned());
        history.latest = Some(latest);
        receiver
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore for InMemoryResultStore {
    fn store_result(&self, envelope: ResultEnvelope) {
        let query_id = envelope.query_id.clone();
        let mut history = self.histories.entry(query_id).or_default();

        history.results.push_front(envelope);
        history.results.truncate(self.capacity);
        history.publish();
        trace!(len = history.results.len(), "Stored query result");
    }

    fn latest_result(&self, query_id: &QueryId) -> Option<ResultEnvelope> {
        self.histories
            .get(query_id)
            .and_then(|history| history.results.front().cloned())
    }

    fn query_results(&self, query_id: &QueryId) -> Vec<ResultEnvelope> {
        self.histories
            .get(query_id)
            .map(|history| history.results.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn all_results(&self) -> HashMap<QueryId, Vec<ResultEnvelope>> {
        self.histories
            .iter()
            .filter(|entry| !entry.value().results.is_empty())
            .map(|entry| (entry.key().clone(), entry.value().results.iter().cloned().collect()))
            .collect()
    }

    fn result_count(&self, query_id: &QueryId) -> usize {
        self.histories.get(query_id).map_or(0, |history| history.results.len())
    }

    fn clear_query_results(&self, query_id: &QueryId) {
        if let Some(mut history) = self.histories.get_mut(query_id) {
            history.results.clear();
            history.publish();
            debug!(query_id = %query_id, "Cleared query results");
        }
        self.histories
            .remove_if(query_id, |_, history| !history.has_subscribers());
    }

    fn clear_all_results(&self) {
        for mut history in self.histories.iter_mut() {
            history.results.clear();
            history.publish();
        }
        self.histories.retain(|_, history| history.has_subscribers());
        debug!("Cleared all query results");
    }
}
