//! Shared utilities for integration tests

#![allow(dead_code)]

use std::sync::Once;

use lanewise_verify::CheckConfig;

static INIT: Once = Once::new();

/// Route harness logs to the test output; `RUST_LOG=debug` shows every case
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Configuration small enough for a debug-build test run
pub fn quick_config() -> CheckConfig {
    CheckConfig::default().with_random_rounds(32)
}
