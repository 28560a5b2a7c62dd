//! # Operation Source
//!
//! The external collaborator (wallet SDK, bundler, node) that builds, submits and
//! reports on operations. The resilience core only ever talks to it through these
//! traits.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Read side: receipts for submitted operations
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// Source-assigned operation identifier
    type Id: Clone + PartialEq + Debug + Display + Send + Sync;

    /// Finalization payload, opaque to the core
    type Receipt: Send;

    type Error: std::error::Error + Send + Sync + 'static;

    /// `Ok(None)` means "not available yet" and is not an error
    async fn receipt_of(&self, id: &Self::Id) -> Result<Option<Self::Receipt>, Self::Error>;
}

/// Write side: building and submitting operations
#[async_trait]
pub trait OperationSource: ReceiptSource {
    /// An operation that has been built but not sent
    type Built: Send;

    async fn build(&self, sequencing_key: u64) -> Result<Self::Built, Self::Error>;

    async fn send(&self, operation: Self::Built) -> Result<Self::Id, Self::Error>;
}
