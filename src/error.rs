//! Crate-level errors for the ambient setup surface (configuration and logging).
//!
//! The three resilience components do not use this type: each is generic over the
//! error produced by the caller's action or Operation Source, and reports it
//! through its own enum (see [`crate::orchestration::SubmitError`] and
//! [`crate::orchestration::PollError`]).

use crate::config::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, SettleError>;
