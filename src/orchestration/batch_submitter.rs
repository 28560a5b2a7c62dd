//! # Concurrent Batch Submitter
//!
//! Produces a [`Batch`] of `n` pending operations. Keys come from the injected
//! [`SequencingKeyStrategy`]; every operation is built before any is sent, and both
//! passes run sequentially in key order so key assignment stays deterministic.
//!
//! Any build or send failure aborts the whole submission. No partial Batch is
//! returned. Counts above [`MAX_BATCH_SIZE`] are refused before keys are
//! generated.

use super::errors::SubmitError;
use super::sequencing::{DescendingKeys, SequencingKeyStrategy};
use super::source::OperationSource;
use super::types::{Batch, PendingOperation};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Largest number of operations a single `submit` call accepts
pub const MAX_BATCH_SIZE: usize = 10_000;

#[derive(Debug, Clone)]
pub struct BatchSubmitter {
    strategy: Arc<dyn SequencingKeyStrategy>,
}

impl Default for BatchSubmitter {
    fn default() -> Self {
        Self::new(DescendingKeys)
    }
}

impl BatchSubmitter {
    pub fn new(strategy: impl SequencingKeyStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub fn with_strategy(strategy: Box<dyn SequencingKeyStrategy>) -> Self {
        Self {
            strategy: Arc::from(strategy),
        }
    }

    pub fn from_config(config: &crate::config::SubmissionConfig) -> Self {
        Self::with_strategy(config.key_strategy())
    }

    /// Build then send `count` operations
    ///
    /// A `count` of zero or less yields an empty Batch without touching the source.
    pub async fn submit<S>(
        &self,
        source: &S,
        count: i64,
    ) -> Result<Batch<S::Id>, SubmitError<S::Error>>
    where
        S: OperationSource + ?Sized,
    {
        if count <= 0 {
            debug!(requested = count, "Nothing to submit, returning empty batch");
            return Ok(Batch::empty());
        }

        let count = usize::try_from(count)
            .ok()
            .filter(|&count| count <= MAX_BATCH_SIZE)
            .ok_or_else(|| {
                error!(requested = count, max = MAX_BATCH_SIZE, "🔴 Batch too large");
                SubmitError::<S::Error>::TooLarge {
                    requested: count,
                    max: MAX_BATCH_SIZE,
                }
            })?;

        let keys = self.strategy.keys(count);
        Self::validate_keys::<S::Error>(&keys, count)?;

        debug!(
            requested = count,
            strategy = ?self.strategy,
            keys = ?keys,
            "📦 Building operations"
        );

        let mut built = Vec::with_capacity(count);
        for (index, &key) in keys.iter().enumerate() {
            match source.build(key).await {
                Ok(operation) => built.push(operation),
                Err(e) => {
                    error!(index = index, sequencing_key = key, error = %e, "🔴 Build failed");
                    return Err(SubmitError::Build {
                        index,
                        key,
                        source: e,
                    });
                }
            }
        }

        let mut operations = Vec::with_capacity(count);
        for (index, (operation, &key)) in built.into_iter().zip(keys.iter()).enumerate() {
            match source.send(operation).await {
                Ok(id) => {
                    debug!(index = index, sequencing_key = key, operation_id = %id, "📤 Operation sent");
                    operations.push(PendingOperation::new(id, key, Utc::now()));
                }
                Err(e) => {
                    error!(
                        index = index,
                        sequencing_key = key,
                        already_sent = operations.len(),
                        error = %e,
                        "🔴 Send failed"
                    );
                    return Err(SubmitError::Send {
                        index,
                        key,
                        source: e,
                    });
                }
            }
        }

        let batch = Batch::new(count, operations);
        info!(
            batch_id = %batch.id(),
            operations = batch.len(),
            "📦 Batch submitted"
        );
        crate::logging::log_batch_operation(&batch.id(), count, batch.len());

        Ok(batch)
    }

    fn validate_keys<E>(keys: &[u64], count: usize) -> Result<(), SubmitError<E>> {
        if keys.len() != count {
            return Err(SubmitError::InvalidKeys {
                count,
                reason: format!("strategy produced {} keys", keys.len()),
            });
        }

        let mut seen = HashSet::with_capacity(count);
        if let Some(duplicate) = keys.iter().find(|key| !seen.insert(**key)) {
            return Err(SubmitError::InvalidKeys {
                count,
                reason: format!("duplicate sequencing key {duplicate}"),
            });
        }

        Ok(())
    }
}

/// Submit `count` operations using descending sequencing keys
pub async fn submit<S>(source: &S, count: i64) -> Result<Batch<S::Id>, SubmitError<S::Error>>
where
    S: OperationSource + ?Sized,
{
    BatchSubmitter::default().submit(source, count).await
}
