//! # Structured Logging Module
//!
//! Environment-aware structured logging for retry, submission and polling runs.
//! Long functional suites against remote nodes are mostly debugged from these
//! records, so each component reports its terminal outcome through the helpers
//! below.

use crate::config::loader::ConfigManager;
use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, SettleError};
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific defaults
///
/// Safe to call repeatedly; only the first call installs a subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = ConfigManager::detect_environment();
        let config = LoggingConfig {
            level: default_level(&environment).to_string(),
            ..LoggingConfig::default()
        };

        if let Err(e) = install_with_fallback(&config) {
            eprintln!("settle: default log filter failed too, logging disabled: {e}");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Initialize logging from loaded configuration
///
/// `RUST_LOG` still takes precedence over `config.level`. Returns an error only
/// for an unparseable filter directive; an already-installed global subscriber
/// is kept.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    install(config)?;
    let _ = LOGGER_INITIALIZED.set(());
    Ok(())
}

/// Install `config`, retrying once with the default level if its filter is rejected
///
/// Returns the fallback's error; an invalid `RUST_LOG` fails both attempts.
fn install_with_fallback(config: &LoggingConfig) -> Result<()> {
    if let Err(e) = install(config) {
        eprintln!("settle: falling back to default log filter: {e}");
        return install(&LoggingConfig::default());
    }
    Ok(())
}

fn install(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_filter(filter),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_filter(filter),
            )
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
    }

    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| SettleError::Logging(format!("invalid log filter '{level}': {e}"))),
    }
}

fn default_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log the terminal outcome of a retried action
pub fn log_retry_operation(component: &str, attempts: u64, max_attempts: u64, succeeded: bool) {
    let status = if succeeded { "succeeded" } else { "exhausted" };
    tracing::info!(
        component = %component,
        attempts = attempts,
        max_attempts = max_attempts,
        status = status,
        timestamp = %Utc::now().to_rfc3339(),
        "🔁 RETRY_OPERATION"
    );
}

/// Log a submitted batch
pub fn log_batch_operation(batch_id: &Uuid, requested: usize, submitted: usize) {
    tracing::info!(
        batch_id = %batch_id,
        requested = requested,
        submitted = submitted,
        timestamp = %Utc::now().to_rfc3339(),
        "📦 BATCH_OPERATION"
    );
}

/// Log the outcome of a confirmation poll
pub fn log_poll_operation(batch_id: &Uuid, resolved: usize, unresolved: usize, sweeps: u32) {
    let status = if unresolved == 0 { "complete" } else { "partial" };
    tracing::info!(
        batch_id = %batch_id,
        resolved = resolved,
        unresolved = unresolved,
        sweeps = sweeps,
        status = status,
        timestamp = %Utc::now().to_rfc3339(),
        "⏳ POLL_OPERATION"
    );
}
