//! # Confirmation Poller
//!
//! Waits for receipts of a [`Batch`] within a deadline. Each sweep queries every
//! member that has not resolved yet; resolved members are never queried again in
//! the same call, bounding source calls to `batch.len() * sweeps`.
//!
//! Reaching the deadline with unresolved members is a normal, partial result. A
//! source error while querying a receipt aborts the poll immediately and is not
//! retried here; wrap the caller in a
//! [`RetryOrchestrator`](crate::resilience::RetryOrchestrator) for that.
//!
//! The first sweep always runs, even when the deadline has already passed. After
//! that, no sweep starts once the deadline is reached, and pauses between sweeps
//! are clamped so the poller never sleeps past it.

use super::errors::PollError;
use super::source::ReceiptSource;
use super::types::{Batch, PollResult};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Pause schedule between sweeps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollCadence {
    /// Same pause after every sweep; zero yields to the runtime and polls again
    Fixed(Duration),
    /// `initial`, then multiplied after each sweep, capped at `max`
    Exponential {
        initial: Duration,
        multiplier: f64,
        max: Duration,
    },
}

impl Default for PollCadence {
    fn default() -> Self {
        PollCadence::Fixed(Duration::ZERO)
    }
}

impl PollCadence {
    /// Pause to take after `completed_sweeps` sweeps (1-based)
    pub fn interval_after(&self, completed_sweeps: u32) -> Duration {
        match *self {
            PollCadence::Fixed(interval) => interval,
            PollCadence::Exponential {
                initial,
                multiplier,
                max,
            } => {
                let exponent = completed_sweeps.saturating_sub(1).min(i32::MAX as u32) as i32;
                let secs = initial.as_secs_f64() * multiplier.powi(exponent);
                if !secs.is_finite() || secs >= max.as_secs_f64() {
                    max
                } else {
                    Duration::from_secs_f64(secs.max(0.0))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmationPoller {
    cadence: PollCadence,
}

impl ConfirmationPoller {
    pub fn new(cadence: PollCadence) -> Self {
        Self { cadence }
    }

    pub fn from_config(config: &crate::config::PollingConfig) -> Self {
        Self::new(config.cadence())
    }

    pub fn cadence(&self) -> PollCadence {
        self.cadence
    }

    /// Poll until every member of `batch` has a receipt or `deadline` passes
    #[tracing::instrument(skip_all, fields(batch_id = %batch.id(), members = batch.len()))]
    pub async fn await_all<S>(
        &self,
        source: &S,
        batch: &Batch<S::Id>,
        deadline: Instant,
    ) -> Result<PollResult<S::Id, S::Receipt>, PollError<S::Error>>
    where
        S: ReceiptSource + ?Sized,
    {
        let started = Instant::now();
        let mut receipts: Vec<Option<S::Receipt>> = batch.iter().map(|_| None).collect();
        let mut outstanding = batch.len();
        let mut sweeps: u32 = 0;

        while outstanding > 0 {
            sweeps += 1;

            for (index, operation) in batch.iter().enumerate() {
                if receipts[index].is_some() {
                    continue;
                }

                match source.receipt_of(operation.id()).await {
                    Ok(Some(receipt)) => {
                        debug!(
                            operation_id = %operation.id(),
                            sweep = sweeps,
                            "✅ Receipt available"
                        );
                        receipts[index] = Some(receipt);
                        outstanding -= 1;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!(
                            operation_id = %operation.id(),
                            sweep = sweeps,
                            error = %e,
                            "🔴 Receipt query failed"
                        );
                        return Err(PollError::Query {
                            identifier: operation.id().to_string(),
                            source: e,
                        });
                    }
                }
            }

            if outstanding == 0 {
                break;
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }

            let pause = self.cadence.interval_after(sweeps).min(deadline - now);
            if pause.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(pause).await;
            }

            if Instant::now() >= deadline {
                break;
            }
        }

        let result = PollResult::from_sweeps(batch, receipts, sweeps, started.elapsed());

        if result.is_complete() {
            info!(
                resolved = result.resolved_count(),
                sweeps = sweeps,
                elapsed_ms = result.elapsed().as_millis() as u64,
                "🟢 All operations confirmed"
            );
        } else {
            warn!(
                resolved = result.resolved_count(),
                unresolved = result.unresolved_count(),
                sweeps = sweeps,
                elapsed_ms = result.elapsed().as_millis() as u64,
                "⏰ Deadline reached with unconfirmed operations"
            );
        }
        crate::logging::log_poll_operation(
            &result.batch_id(),
            result.resolved_count(),
            result.unresolved_count(),
            sweeps,
        );

        Ok(result)
    }

    /// Like [`Self::await_all`] with a deadline `timeout` from now
    pub async fn await_all_within<S>(
        &self,
        source: &S,
        batch: &Batch<S::Id>,
        timeout: Duration,
    ) -> Result<PollResult<S::Id, S::Receipt>, PollError<S::Error>>
    where
        S: ReceiptSource + ?Sized,
    {
        self.await_all(source, batch, Instant::now() + timeout).await
    }
}

/// Poll `batch` until every member resolves or `deadline` passes, pausing
/// `poll_interval` between sweeps
pub async fn await_all<S>(
    source: &S,
    batch: &Batch<S::Id>,
    deadline: Instant,
    poll_interval: Duration,
) -> Result<PollResult<S::Id, S::Receipt>, PollError<S::Error>>
where
    S: ReceiptSource + ?Sized,
{
    ConfirmationPoller::new(PollCadence::Fixed(poll_interval))
        .await_all(source, batch, deadline)
        .await
}
