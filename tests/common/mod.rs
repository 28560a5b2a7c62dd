#![allow(dead_code)]

pub mod mock_source;

pub use mock_source::*;

use std::path::PathBuf;

/// Per-test setup: test environment variables plus structured logging
pub fn setup() {
    settle_core::test_utils::setup_test_environment();
    settle_core::logging::init_structured_logging();
}

/// Checked-in configuration directory
pub fn config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config")
}
