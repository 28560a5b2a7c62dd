//! # Orchestration
//!
//! Submitting batches of operations to an external [`OperationSource`] and waiting
//! for their receipts.
//!
//! ```rust,no_run
//! use settle_core::orchestration::{submit, await_all, OperationSource};
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! # async fn example<S: OperationSource>(source: &S) -> Result<(), Box<dyn std::error::Error>> {
//! let batch = submit(source, 3).await?;
//! let deadline = Instant::now() + Duration::from_secs(60);
//! let result = await_all(source, &batch, deadline, Duration::from_secs(1)).await?;
//!
//! for id in result.unresolved() {
//!     println!("operation {id} not confirmed before the deadline");
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch_submitter;
pub mod confirmation_poller;
pub mod errors;
pub mod sequencing;
pub mod source;
pub mod types;

pub use batch_submitter::{submit, BatchSubmitter, MAX_BATCH_SIZE};
pub use confirmation_poller::{await_all, ConfirmationPoller, PollCadence};
pub use errors::{PollError, SubmitError};
pub use sequencing::{DescendingKeys, OffsetKeys, SequencingKeyStrategy};
pub use source::{OperationSource, ReceiptSource};
pub use types::{Batch, PendingOperation, PollResult, ResolutionState};
