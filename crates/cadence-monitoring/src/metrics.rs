//! Execution metrics, recorded as structured tracing events.

use tracing::{debug, info};

/// Metrics for scheduled query executions
pub struct QueryMetrics;

impl QueryMetrics {
    /// Record one query execution
    pub fn record_execution(query_id: &str, data_source_id: &str, duration_ms: f64, success: bool) {
        debug!(
            target: "cadence::metrics",
            query_id,
            data_source_id,
            duration_ms,
            success,
            "query_execution"
        );
    }

    /// Record a timer firing that was skipped because the previous run was still in flight
    pub fn record_skipped_tick(query_id: &str) {
        debug!(target: "cadence::metrics", query_id, "query_tick_skipped");
    }

    /// Record the number of running schedules after a start or stop
    pub fn record_running_schedules(count: usize) {
        info!(target: "cadence::metrics", running = count, "running_schedules");
    }
}
