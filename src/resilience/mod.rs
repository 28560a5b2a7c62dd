//! # Resilience Module
//!
//! Bounded retry for flaky test actions.
//!
//! ## Usage
//!
//! ```rust
//! use settle_core::resilience::{RetryOrchestrator, RetryPolicy};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let orchestrator = RetryOrchestrator::new(
//!     "transfer_suite",
//!     RetryPolicy::new(3, Duration::from_millis(10)),
//! );
//! let calls = AtomicU32::new(0);
//! let calls = &calls;
//!
//! // fails once, then succeeds on the retry
//! let confirmed = orchestrator
//!     .run(move || async move {
//!         if calls.fetch_add(1, Ordering::SeqCst) == 0 {
//!             return Err("receipt not found".to_string());
//!         }
//!         Ok::<u32, String>(2)
//!     })
//!     .await;
//!
//! assert_eq!(confirmed, Ok(2));
//! assert_eq!(calls.load(Ordering::SeqCst), 2);
//! # });
//! ```

pub mod retry;

pub use retry::{run_with_retry, Attempt, AttemptOutcome, RetryOrchestrator, RetryPolicy};
