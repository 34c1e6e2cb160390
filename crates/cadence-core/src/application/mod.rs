/// Query execution and result wrapping
pub mod query_executor;

/// Per-query recurring timers
pub mod query_scheduler;
