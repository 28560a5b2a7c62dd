#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Settle Core
//!
//! Resilience core for functional suites that drive a wallet SDK against live
//! nodes and bundler services.
//!
//! ## Overview
//!
//! Remote chains confirm operations eventually, and test actions against them fail
//! intermittently. This crate holds the three pieces every such suite needs:
//!
//! - **Retry Orchestrator** ([`resilience`]): re-runs a failing action after a fixed
//!   delay, up to a bound, and surfaces the last error unchanged.
//! - **Concurrent Batch Submitter** ([`orchestration::BatchSubmitter`]): builds `n`
//!   operations with distinct sequencing keys, then sends them, in order.
//! - **Confirmation Poller** ([`orchestration::ConfirmationPoller`]): polls receipts
//!   for a batch until all resolve or a deadline passes, returning a possibly
//!   partial result.
//!
//! The SDK side is reached only through the [`orchestration::OperationSource`] trait.
//!
//! ## Module Organization
//!
//! - [`resilience`] - Retry orchestration
//! - [`orchestration`] - Batch submission and confirmation polling
//! - [`config`] - YAML/environment configuration of default values
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Crate-level errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use settle_core::orchestration::{await_all, submit, OperationSource};
//! use settle_core::resilience::run_with_retry;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! # async fn example<S: OperationSource>(source: &S) -> Result<(), Box<dyn std::error::Error>> {
//! run_with_retry(
//!     move || async move {
//!         let batch = submit(source, 3).await?;
//!         let deadline = Instant::now() + Duration::from_secs(60);
//!         let result = await_all(source, &batch, deadline, Duration::from_secs(1)).await?;
//!         if result.resolved_count() == 0 {
//!             return Err("no operation confirmed".into());
//!         }
//!         Ok::<(), Box<dyn std::error::Error>>(())
//!     },
//!     3,
//!     Duration::from_secs(2),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod resilience;
pub mod test_utils;

pub use config::{ConfigManager, SettleConfig};
pub use error::{Result, SettleError};
pub use orchestration::{
    await_all, submit, Batch, BatchSubmitter, ConfirmationPoller, OperationSource,
    PendingOperation, PollCadence, PollError, PollResult, ReceiptSource, ResolutionState,
    SubmitError,
};
pub use resilience::{run_with_retry, RetryOrchestrator, RetryPolicy};
