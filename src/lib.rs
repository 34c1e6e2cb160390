//! Cadence - recurring queries against named data sources.
//!
//! Each query runs on its own timer; every execution is wrapped in a result
//! envelope and kept in a bounded, newest-first history per query.
//!
//! [`QueryRuntime`] wires the in-memory registry and result store to the
//! executor and scheduler from `cadence-core`.

pub mod config;
pub mod runtime;

pub use config::CadenceConfig;
pub use runtime::{QueryRuntime, QueryRuntimeBuilder};

pub use cadence_core as core;
pub use cadence_monitoring as monitoring;
pub use cadence_state_inmemory as state;

pub use cadence_core::{
    CoreError, DataSource, DataSourceDescriptor, DataSourceId, DataSourceRegistry, OverlapPolicy,
    QueryDefinition, QueryExecution, QueryId, QueryRepository, ResultEnvelope, ResultStatus,
    ResultStore, Row, SchedulerConfig,
};
