//! Test environment helpers.

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,cadence=debug,cadence_core=debug")),
        )
        .with_test_writer()
        .try_init();
}
