//! # Settle Configuration
//!
//! Defaults for the resilience components, loaded from YAML with environment
//! overlays. Nothing in the retry, submission or polling code reads this module
//! directly: callers turn a loaded [`SettleConfig`] into the per-invocation values
//! (retry policy, poll cadence, deadline) they pass in.
//!
//! ## Sources, lowest precedence first
//!
//! 1. Built-in defaults ([`SettleConfig::default`])
//! 2. `<dir>/settle.yaml`
//! 3. `<dir>/settle.<environment>.yaml`
//! 4. Environment variables `SETTLE__<SECTION>__<KEY>`, e.g. `SETTLE__RETRY__MAX_RETRIES=5`
//!
//! ```rust,no_run
//! use settle_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let policy = manager.config().retry.policy();
//! let cadence = manager.config().polling.cadence();
//! # let _ = (policy, cadence);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::orchestration::{
    DescendingKeys, OffsetKeys, PollCadence, SequencingKeyStrategy, MAX_BATCH_SIZE,
};
use crate::resilience::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring settle.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SettleConfig {
    /// Retry Orchestrator defaults
    pub retry: RetryConfig,

    /// Confirmation Poller defaults
    pub polling: PollingConfig,

    /// Batch Submitter defaults
    pub submission: SubmissionConfig,

    /// Structured logging settings
    pub logging: LoggingConfig,
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Additional attempts after the first
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }
}

/// Confirmation polling configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Relative deadline applied by callers that do not compute their own
    pub timeout_ms: u64,
    /// Pause between sweeps; zero polls as fast as the runtime allows
    pub poll_interval_ms: u64,
    /// 1.0 keeps a fixed cadence, anything larger enables back-off
    pub backoff_multiplier: f64,
    /// Upper bound on the pause once back-off is enabled
    pub max_poll_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            poll_interval_ms: 1000,
            backoff_multiplier: 1.0,
            max_poll_interval_ms: 10_000,
        }
    }
}

impl PollingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cadence(&self) -> PollCadence {
        let initial = Duration::from_millis(self.poll_interval_ms);
        if self.backoff_multiplier > 1.0 {
            PollCadence::Exponential {
                initial,
                multiplier: self.backoff_multiplier,
                max: Duration::from_millis(self.max_poll_interval_ms),
            }
        } else {
            PollCadence::Fixed(initial)
        }
    }
}

/// Batch submission configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Operation count used by suites that do not pick their own
    pub default_batch_size: i64,
    /// When set, keys ascend from this base instead of counting down to zero
    pub key_base: Option<u64>,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            default_batch_size: 3,
            key_base: None,
        }
    }
}

impl SubmissionConfig {
    pub fn key_strategy(&self) -> Box<dyn SequencingKeyStrategy> {
        match self.key_base {
            Some(base) => Box::new(OffsetKeys::new(base)),
            None => Box::new(DescendingKeys),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl SettleConfig {
    /// Reject combinations the components cannot honour
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.polling.backoff_multiplier.is_finite() || self.polling.backoff_multiplier < 1.0 {
            return Err(ConfigurationError::invalid_value(
                "polling.backoff_multiplier",
                format!(
                    "must be a finite number >= 1.0, got {}",
                    self.polling.backoff_multiplier
                ),
            ));
        }

        if self.polling.backoff_multiplier > 1.0
            && self.polling.max_poll_interval_ms < self.polling.poll_interval_ms
        {
            return Err(ConfigurationError::invalid_value(
                "polling.max_poll_interval_ms",
                format!(
                    "must be >= poll_interval_ms ({}) when back-off is enabled, got {}",
                    self.polling.poll_interval_ms, self.polling.max_poll_interval_ms
                ),
            ));
        }

        if self.submission.default_batch_size > MAX_BATCH_SIZE as i64 {
            return Err(ConfigurationError::invalid_value(
                "submission.default_batch_size",
                format!(
                    "must be <= {MAX_BATCH_SIZE}, got {}",
                    self.submission.default_batch_size
                ),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "logging.level",
                "must not be empty",
            ));
        }

        Ok(())
    }
}
