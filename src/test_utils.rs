//! # Test Utilities
//!
//! Environment helpers shared by unit and integration tests. Each helper only
//! sets a variable when it is not already present, so CI overrides win.

use std::env;

/// Setup test environment variables
pub fn setup_test_environment() {
    if env::var("SETTLE_ENV").is_err() {
        env::set_var("SETTLE_ENV", "test");
    }
}

/// Environment name for tests, without touching the process environment
pub fn test_environment() -> String {
    env::var("SETTLE_ENV").unwrap_or_else(|_| "test".to_string())
}
