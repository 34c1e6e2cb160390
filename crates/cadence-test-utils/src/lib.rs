//! Testing utilities for the Cadence query scheduler.
//!
//! Mocks and fakes for the collaborator traits, sample descriptors and rows,
//! and logging setup for tests.

pub mod data_generators;
pub mod mocks;
pub mod util;

/// Re-export commonly used types for convenience
pub use mockall;

pub use data_generators::*;
pub use mocks::*;
pub use util::init_test_logging;
