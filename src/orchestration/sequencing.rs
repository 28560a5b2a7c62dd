//! Sequencing key strategies
//!
//! Concurrently built operations need distinct sequencing keys or the source
//! treats them as conflicting. The strategy is injected into the
//! [`BatchSubmitter`](super::BatchSubmitter) instead of living in a shared counter.

use std::fmt::Debug;

pub trait SequencingKeyStrategy: Send + Sync + Debug {
    /// Keys for `count` operations, in build order
    fn keys(&self, count: usize) -> Vec<u64>;
}

/// `count - 1` down to `0`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescendingKeys;

impl SequencingKeyStrategy for DescendingKeys {
    fn keys(&self, count: usize) -> Vec<u64> {
        (0..count as u64).rev().collect()
    }
}

/// `base`, `base + 1`, ... (e.g. starting at an account's current nonce)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetKeys {
    base: u64,
}

impl OffsetKeys {
    pub fn new(base: u64) -> Self {
        Self { base }
    }
}

impl SequencingKeyStrategy for OffsetKeys {
    fn keys(&self, count: usize) -> Vec<u64> {
        // stops short on overflow; the submitter rejects short key lists
        (0..count as u64)
            .map_while(|offset| self.base.checked_add(offset))
            .collect()
    }
}
