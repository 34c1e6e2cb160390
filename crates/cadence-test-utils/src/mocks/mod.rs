//! Mock implementations of the Cadence collaborator interfaces.

pub mod data_source;
pub mod executor;

pub use data_source::*;
pub use executor::*;
