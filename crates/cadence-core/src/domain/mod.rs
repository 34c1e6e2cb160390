/// Query definitions
pub mod query;

/// Data source descriptors
pub mod data_source;

/// Result envelopes
pub mod result;

/// Collaborator interfaces
pub mod repository;
