//!
//! Cadence Core - scheduling and execution of recurring queries
//!
//! This crate defines the domain model, the collaborator interfaces, the
//! query executor and the per-query scheduler. Storage and data source
//! implementations live in other crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - queries, data sources, results and collaborator traits
pub mod domain;

/// Application services - executor and scheduler
pub mod application;

/// Scheduler configuration
pub mod config;

/// Error types
pub mod error;

// Re-export key types
pub use error::CoreError;

pub use application::query_executor::{project_rows, QueryExecution, QueryExecutor, DATA_SOURCE_NOT_FOUND};
pub use application::query_scheduler::QueryScheduler;
pub use config::{OverlapPolicy, SchedulerConfig, DEFAULT_HISTORY_CAPACITY};

pub use domain::data_source::{DataSourceDescriptor, DataSourceId, ParameterSpec, ParameterType};
pub use domain::query::{ParameterMap, QueryDefinition, QueryId, QueryParameter};
pub use domain::repository::{DataSource, DataSourceRegistry, QueryRepository, ResultStore};
pub use domain::result::{ResultEnvelope, ResultStatus, Row};
