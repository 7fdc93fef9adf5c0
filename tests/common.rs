// tests/common.rs
//! Shared test utilities: logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Test-friendly logging; respects RUST_LOG.
/// Safe to call from every test.
#[allow(dead_code)]
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// Force info-level logging even if RUST_LOG is not set
#[allow(dead_code)]
pub fn setup_info() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::new("info"))
        .try_init()
        .ok();
}
