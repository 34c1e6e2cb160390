//! Per-query recurring timers.
//!
//! Each running query owns one timer task. A firing spawns an independent
//! execution, so a slow data source never delays the timer itself and never
//! blocks other queries.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use cadence_monitoring::metrics::QueryMetrics;

use super::query_executor::QueryExecution;
use crate::config::{OverlapPolicy, SchedulerConfig};
use crate::domain::query::{QueryDefinition, QueryId};
use crate::CoreError;

/// Live timer for one query
struct ScheduleHandle {
    /// Timer task driving the firings
    timer: JoinHandle<()>,

    /// Set before the task is aborted so a firing racing the abort is dropped
    cancelled: Arc<AtomicBool>,
}

impl ScheduleHandle {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.timer.abort();
    }
}

/// Decrements the in-flight counter when an execution finishes or unwinds
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Manages one independent repeating timer per query.
///
/// At most one timer is live per query id. Failed executions never stop a
/// timer; only [`QueryScheduler::stop_query`] and
/// [`QueryScheduler::stop_all_queries`] do.
pub struct QueryScheduler {
    /// Runs each tick
    executor: Arc<dyn QueryExecution>,

    /// Overlap behaviour
    config: SchedulerConfig,

    /// Live handles keyed by query id
    handles: Mutex<HashMap<QueryId, ScheduleHandle>>,
}

impl QueryScheduler {
    /// Create a scheduler with no running queries
    pub fn new(executor: Arc<dyn QueryExecution>, config: SchedulerConfig) -> Self {
        Self {
            executor,
            config,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Start running a query, replacing any timer already running for its id.
    ///
    /// The first execution is spawned immediately and runs in the background,
    /// so a slow data source never delays the caller or other queries. Later
    /// executions fire every `query.interval` from the moment of the call.
    pub async fn start_query(&self, query: QueryDefinition) -> Result<(), CoreError> {
        query.validate()?;

        let query = Arc::new(query);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let start = Instant::now();

        let running = {
            let mut handles = self.handles.lock();
            if let Some(previous) = handles.remove(&query.id) {
                previous.cancel();
                info!(query_id = %query.id, "Replacing running schedule");
            }

            let cancelled = Arc::new(AtomicBool::new(false));
            let timer = tokio::spawn(run_timer(
                self.executor.clone(),
                query.clone(),
                cancelled.clone(),
                in_flight.clone(),
                self.config.overlap_policy,
                start,
            ));
            handles.insert(query.id.clone(), ScheduleHandle { timer, cancelled });
            handles.len()
        };

        info!(
            query_id = %query.id,
            data_source_id = %query.data_source_id,
            interval_ms = query.interval.as_millis() as u64,
            "Query scheduled"
        );
        QueryMetrics::record_running_schedules(running);

        spawn_execution(self.executor.clone(), query, &in_flight);
        Ok(())
    }

    /// Stop a query's timer. Returns `false` if the query was not running.
    ///
    /// An execution already in flight still completes and stores its result.
    pub fn stop_query(&self, query_id: &QueryId) -> bool {
        let (stopped, running) = {
            let mut handles = self.handles.lock();
            let stopped = match handles.remove(query_id) {
                Some(handle) => {
                    handle.cancel();
                    true
                }
                None => false,
            };
            (stopped, handles.len())
        };

        if stopped {
            info!(query_id = %query_id, "Query stopped");
            QueryMetrics::record_running_schedules(running);
        } else {
            debug!(query_id = %query_id, "Stop requested for query that is not running");
        }
        stopped
    }

    /// Stop every running query. Returns how many were stopped.
    pub fn stop_all_queries(&self) -> usize {
        let stopped = cancel_all(&mut self.handles.lock());
        if stopped > 0 {
            info!(stopped, "All queries stopped");
            QueryMetrics::record_running_schedules(0);
        }
        stopped
    }

    /// Whether a timer is live for the query
    pub fn is_running(&self, query_id: &QueryId) -> bool {
        self.handles.lock().contains_key(query_id)
    }

    /// Ids of every running query, sorted
    pub fn running_queries(&self) -> Vec<QueryId> {
        let mut ids: Vec<QueryId> = self.handles.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The scheduler configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl Drop for QueryScheduler {
    fn drop(&mut self) {
        cancel_all(self.handles.get_mut());
    }
}

fn cancel_all(handles: &mut HashMap<QueryId, ScheduleHandle>) -> usize {
    let count = handles.len();
    for (_, handle) in handles.drain() {
        handle.cancel();
    }
    count
}

async fn run_timer(
    executor: Arc<dyn QueryExecution>,
    query: Arc<QueryDefinition>,
    cancelled: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
    overlap_policy: OverlapPolicy,
    start: Instant,
) {
    let mut ticker = tokio::time::interval_at(start + query.interval, query.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if cancelled.load(Ordering::Acquire) {
            break;
        }

        if overlap_policy == OverlapPolicy::SkipIfRunning && in_flight.load(Ordering::Acquire) > 0 {
            debug!(query_id = %query.id, "Previous execution still running, skipping tick");
            QueryMetrics::record_skipped_tick(query.id.as_str());
            continue;
        }

        spawn_execution(executor.clone(), query.clone(), &in_flight);
    }
}

/// Run one execution on its own task. The in-flight count covers it until it finishes.
fn spawn_execution(
    executor: Arc<dyn QueryExecution>,
    query: Arc<QueryDefinition>,
    in_flight: &Arc<AtomicUsize>,
) {
    let guard = InFlightGuard::enter(in_flight);
    tokio::spawn(async move {
        let _guard = guard;
        execute_tick(executor.as_ref(), &query).await;
    });
}

async fn execute_tick(executor: &dyn QueryExecution, query: &QueryDefinition) {
    let envelope = executor.execute(query).await;
    if let Some(error) = &envelope.error {
        warn!(query_id = %query.id, error = %error, "Scheduled execution reported an error");
    }
}
