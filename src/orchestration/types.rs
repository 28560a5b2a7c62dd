//! Shared types for batch submission and confirmation polling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Where a submitted operation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// Submitted, outcome not known yet
    Pending,
    /// A receipt was returned before the deadline
    Resolved,
    /// Still no receipt when the deadline passed
    TimedOut,
}

impl std::fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionState::Pending => write!(f, "pending"),
            ResolutionState::Resolved => write!(f, "resolved"),
            ResolutionState::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// An operation accepted by the source whose finalization is not yet known
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperation<Id> {
    id: Id,
    sequencing_key: u64,
    submitted_at: DateTime<Utc>,
    state: ResolutionState,
}

impl<Id> PendingOperation<Id> {
    pub(crate) fn new(id: Id, sequencing_key: u64, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            sequencing_key,
            submitted_at,
            state: ResolutionState::Pending,
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn sequencing_key(&self) -> u64 {
        self.sequencing_key
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    pub(crate) fn with_state(&self, state: ResolutionState) -> Self
    where
        Id: Clone,
    {
        Self {
            id: self.id.clone(),
            sequencing_key: self.sequencing_key,
            submitted_at: self.submitted_at,
            state,
        }
    }
}

/// Ordered, immutable set of operations produced by one submission
///
/// Iteration order is submission order. Sequencing keys are pairwise distinct and
/// `len()` never exceeds the requested count.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<Id> {
    batch_id: Uuid,
    requested: usize,
    operations: Vec<PendingOperation<Id>>,
}

impl<Id> Batch<Id> {
    pub(crate) fn new(requested: usize, operations: Vec<PendingOperation<Id>>) -> Self {
        debug_assert!(operations.len() <= requested);
        Self {
            batch_id: Uuid::new_v4(),
            requested,
            operations,
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    /// Correlation id for logs
    pub fn id(&self) -> Uuid {
        self.batch_id
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PendingOperation<Id>> {
        self.operations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingOperation<Id>> {
        self.operations.iter()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &Id> {
        self.operations.iter().map(PendingOperation::id)
    }

    pub fn sequencing_keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.operations.iter().map(PendingOperation::sequencing_key)
    }
}

impl<'a, Id> IntoIterator for &'a Batch<Id> {
    type Item = &'a PendingOperation<Id>;
    type IntoIter = std::slice::Iter<'a, PendingOperation<Id>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

/// Outcome of one confirmation poll over a [`Batch`]
///
/// Receipts are reported for members that resolved before the deadline; the rest
/// are listed as unresolved. Both views keep Batch order.
#[derive(Debug, Clone)]
pub struct PollResult<Id, R> {
    batch_id: Uuid,
    operations: Vec<PendingOperation<Id>>,
    receipts: Vec<Option<R>>,
    sweeps: u32,
    elapsed: Duration,
}

impl<Id, R> PollResult<Id, R>
where
    Id: Clone + PartialEq,
{
    pub(crate) fn from_sweeps(
        batch: &Batch<Id>,
        receipts: Vec<Option<R>>,
        sweeps: u32,
        elapsed: Duration,
    ) -> Self {
        let operations = batch
            .iter()
            .zip(receipts.iter())
            .map(|(operation, receipt)| {
                let state = if receipt.is_some() {
                    ResolutionState::Resolved
                } else {
                    ResolutionState::TimedOut
                };
                operation.with_state(state)
            })
            .collect();

        Self {
            batch_id: batch.id(),
            operations,
            receipts,
            sweeps,
            elapsed,
        }
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// Resolved identifiers with their receipts, in Batch order
    pub fn resolved(&self) -> impl Iterator<Item = (&Id, &R)> {
        self.operations
            .iter()
            .zip(self.receipts.iter())
            .filter_map(|(operation, receipt)| receipt.as_ref().map(|r| (operation.id(), r)))
    }

    /// Identifiers still without a receipt at the deadline, in Batch order
    pub fn unresolved(&self) -> impl Iterator<Item = &Id> {
        self.operations
            .iter()
            .zip(self.receipts.iter())
            .filter(|(_, receipt)| receipt.is_none())
            .map(|(operation, _)| operation.id())
    }

    /// Every member with its final state
    pub fn operations(&self) -> &[PendingOperation<Id>] {
        &self.operations
    }

    pub fn receipt(&self, id: &Id) -> Option<&R> {
        self.position(id)
            .and_then(|index| self.receipts[index].as_ref())
    }

    /// `None` when `id` is not part of the polled Batch
    pub fn resolution_of(&self, id: &Id) -> Option<ResolutionState> {
        self.position(id).map(|index| self.operations[index].state())
    }

    pub fn resolved_count(&self) -> usize {
        self.receipts.iter().filter(|r| r.is_some()).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.receipts.len() - self.resolved_count()
    }

    pub fn is_complete(&self) -> bool {
        self.receipts.iter().all(Option::is_some)
    }

    /// Number of sweeps performed over the Batch
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn position(&self, id: &Id) -> Option<usize> {
        self.operations.iter().position(|op| op.id() == id)
    }
}
