//! In-memory state for the Cadence query scheduler
//!
//! This crate provides in-process implementations of the collaborator
//! interfaces defined in `cadence-core`. Nothing here survives a restart.

pub mod registry;
pub use registry::InMemoryDataSourceRegistry;

pub mod repositories;
pub use repositories::InMemoryQueryRepository;

pub mod result_store;
pub use result_store::InMemoryResultStore;

pub mod static_source;
pub use static_source::StaticDataSource;

#[cfg(test)]
mod tests;
