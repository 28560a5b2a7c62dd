//! Errors surfaced by batch submission and confirmation polling
//!
//! Both enums are generic over the Operation Source error and keep it as the
//! `source()` of the wrapper, so callers can report the original cause.

/// Failure of a [`BatchSubmitter::submit`](super::BatchSubmitter::submit) call
#[derive(Debug, thiserror::Error)]
pub enum SubmitError<E> {
    /// The sequencing key strategy did not produce `count` distinct keys
    #[error("Invalid sequencing keys for {count} operations: {reason}")]
    InvalidKeys { count: usize, reason: String },

    #[error("Requested {requested} operations, at most {max} can be submitted in one batch")]
    TooLarge { requested: i64, max: usize },

    #[error("Failed to build operation {index} (sequencing key {key}): {source}")]
    Build {
        index: usize,
        key: u64,
        #[source]
        source: E,
    },

    #[error("Failed to send operation {index} (sequencing key {key}): {source}")]
    Send {
        index: usize,
        key: u64,
        #[source]
        source: E,
    },
}

impl<E> SubmitError<E> {
    /// The Operation Source error, if the failure came from the source
    pub fn source_error(&self) -> Option<&E> {
        match self {
            SubmitError::Build { source, .. } | SubmitError::Send { source, .. } => Some(source),
            SubmitError::InvalidKeys { .. } | SubmitError::TooLarge { .. } => None,
        }
    }

    pub fn into_source_error(self) -> Option<E> {
        match self {
            SubmitError::Build { source, .. } | SubmitError::Send { source, .. } => Some(source),
            SubmitError::InvalidKeys { .. } | SubmitError::TooLarge { .. } => None,
        }
    }
}

/// Failure of a confirmation poll
///
/// A missing receipt is never an error; this only covers the source failing to
/// answer.
#[derive(Debug, thiserror::Error)]
pub enum PollError<E> {
    #[error("Receipt query failed for operation {identifier}: {source}")]
    Query {
        identifier: String,
        #[source]
        source: E,
    },
}

impl<E> PollError<E> {
    pub fn source_error(&self) -> &E {
        match self {
            PollError::Query { source, .. } => source,
        }
    }

    pub fn into_source_error(self) -> E {
        match self {
            PollError::Query { source, .. } => source,
        }
    }
}
