//! # Retry Orchestrator
//!
//! Bounded retry for flaky async test actions. An action is invoked, and on failure
//! re-invoked after a fixed delay until it succeeds or the attempt budget
//! (`max_retries + 1`) runs out. The caller sees exactly one terminal outcome: the
//! action's success value, or the error from the last attempt, unchanged.
//!
//! Every error is treated as retryable. Actions that need to abort immediately
//! must decide that internally.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How many times to retry and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first
    pub max_retries: u32,
    /// Pause between a failed attempt and the next one
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Outcome of a single attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    Failed { error: String },
}

/// One execution of the action inside a single `run` call
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    /// 0-based
    pub ordinal: u64,
    pub outcome: AttemptOutcome,
    pub started_at: DateTime<Utc>,
}

/// Runs actions under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryOrchestrator {
    /// Component name for logging
    name: String,
    policy: RetryPolicy,
}

impl RetryOrchestrator {
    pub fn new(name: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    pub fn from_config(name: impl Into<String>, config: &crate::config::RetryConfig) -> Self {
        Self::new(name, config.policy())
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute `action` until it succeeds or the attempt budget is exhausted
    ///
    /// Returns the first success, or the error produced by the final attempt.
    pub async fn run<T, E, F, Fut>(&self, mut action: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.policy.max_attempts();
        let started = Instant::now();
        let mut attempts: Vec<Attempt> = Vec::new();

        loop {
            let ordinal = attempts.len() as u64;
            let started_at = Utc::now();

            debug!(
                component = %self.name,
                attempt = ordinal + 1,
                max_attempts = max_attempts,
                "🔁 Starting attempt"
            );

            match action().await {
                Ok(value) => {
                    attempts.push(Attempt {
                        ordinal,
                        outcome: AttemptOutcome::Succeeded,
                        started_at,
                    });
                    self.log_terminal(&attempts, started.elapsed());
                    return Ok(value);
                }
                Err(error) => {
                    attempts.push(Attempt {
                        ordinal,
                        outcome: AttemptOutcome::Failed {
                            error: error.to_string(),
                        },
                        started_at,
                    });

                    if attempts.len() as u64 >= max_attempts {
                        self.log_terminal(&attempts, started.elapsed());
                        return Err(error);
                    }

                    warn!(
                        component = %self.name,
                        attempt = ordinal + 1,
                        max_attempts = max_attempts,
                        retry_delay_ms = self.policy.retry_delay.as_millis() as u64,
                        error = %error,
                        "🟡 Attempt failed, will retry"
                    );

                    if !self.policy.retry_delay.is_zero() {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }
    }

    fn log_terminal(&self, attempts: &[Attempt], elapsed: Duration) {
        let Some(last) = attempts.last() else {
            return;
        };

        let history = serde_json::to_string(attempts).unwrap_or_default();
        match &last.outcome {
            AttemptOutcome::Succeeded => info!(
                component = %self.name,
                attempts = attempts.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "🟢 Action succeeded"
            ),
            AttemptOutcome::Failed { error } => warn!(
                component = %self.name,
                attempts = attempts.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %error,
                history = %history,
                "🔴 Retries exhausted, surfacing last error"
            ),
        }

        crate::logging::log_retry_operation(
            &self.name,
            attempts.len() as u64,
            self.policy.max_attempts(),
            matches!(last.outcome, AttemptOutcome::Succeeded),
        );
    }
}

/// Run `action` with up to `max_retries` additional attempts, pausing `retry_delay`
/// between attempts
pub async fn run_with_retry<T, E, F, Fut>(
    action: F,
    max_retries: u32,
    retry_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryOrchestrator::new("retry", RetryPolicy::new(max_retries, retry_delay))
        .run(action)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_success_on_first_attempt_makes_one_call() {
        let calls = AtomicU32::new(0);

        let result: Result<&str, String> = run_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok("done") }
            },
            5,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = run_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("boom".to_string()) }
            },
            0,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error_unchanged() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = run_with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(format!("failure #{n}")) }
            },
            2,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap_err(), "failure #2");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_success_after_failures_stops_retrying() {
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = run_with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("not yet".to_string())
                    } else {
                        Ok(n)
                    }
                }
            },
            10,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_attempts() {
        let starts = Mutex::new(Vec::new());
        let origin = tokio::time::Instant::now();
        let orchestrator =
            RetryOrchestrator::new("timing", RetryPolicy::new(2, Duration::from_millis(500)));

        let result: Result<(), String> = orchestrator
            .run(|| {
                starts.lock().unwrap().push(origin.elapsed());
                async { Err("always".to_string()) }
            })
            .await;

        assert!(result.is_err());
        let starts = starts.into_inner().unwrap();
        assert_eq!(starts.len(), 3);
        assert_eq!(starts[0], Duration::ZERO);
        for pair in starts.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(500), "gap too short: {gap:?}");
            assert!(gap < Duration::from_millis(510), "gap too long: {gap:?}");
        }
        // no trailing delay after the last attempt
        assert_eq!(origin.elapsed(), starts[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_success() {
        let origin = tokio::time::Instant::now();
        let orchestrator =
            RetryOrchestrator::new("timing", RetryPolicy::new(3, Duration::from_secs(1)));

        let result: Result<(), String> = orchestrator.run(|| async { Ok(()) }).await;

        assert!(result.is_ok());
        assert_eq!(origin.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_policy_defaults() {
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
        assert_eq!(RetryPolicy::default().max_attempts(), 4);
    }

    proptest! {
        #[test]
        fn prop_always_failing_action_makes_max_retries_plus_one_attempts(max_retries in 0u32..8) {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let calls = AtomicU32::new(0);

            let result: Result<(), u32> = runtime.block_on(run_with_retry(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err(n) }
                },
                max_retries,
                Duration::ZERO,
            ));

            prop_assert_eq!(result.unwrap_err(), max_retries);
            prop_assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
        }

        #[test]
        fn prop_success_on_attempt_k_makes_exactly_k_attempts(
            (max_retries, k) in (0u32..8).prop_flat_map(|m| (Just(m), 1..=m + 1))
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let calls = AtomicU32::new(0);

            let result: Result<u32, String> = runtime.block_on(run_with_retry(
                || {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if attempt < k {
                            Err(format!("attempt {attempt}"))
                        } else {
                            Ok(attempt)
                        }
                    }
                },
                max_retries,
                Duration::ZERO,
            ));

            prop_assert_eq!(result.unwrap(), k);
            prop_assert_eq!(calls.load(Ordering::SeqCst), k);
        }
    }
}
