//! Scripted Operation Source for integration tests
//!
//! Stands in for the wallet SDK and bundler: records every call, hands out
//! identifiers derived from sequencing keys, and makes receipts available after a
//! scripted number of queries.

use async_trait::async_trait;
use settle_core::orchestration::{OperationSource, ReceiptSource};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MockSourceError {
    #[error("bundler rejected operation with sequencing key {0}")]
    SendRejected(u64),

    #[error("invalid account state for sequencing key {0}")]
    BuildFailed(u64),

    #[error("malformed identifier {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    Build(u64),
    Send(u64),
    Receipt(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltOperation {
    pub sequencing_key: u64,
    pub call_data: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockReceipt {
    pub operation_id: String,
    pub success: bool,
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<SourceCall>,
    receipt_queries: HashMap<String, u32>,
    rejections_left: u32,
}

/// Operation Source test double
#[derive(Debug, Default)]
pub struct MockOperationSource {
    state: Mutex<MockState>,
    /// Receipt for a sequencing key appears on this (1-based) query; absent keys never resolve
    receipt_after: HashMap<u64, u32>,
    failing_build_keys: HashSet<u64>,
    rejected_send_key: Option<u64>,
    malformed_keys: HashSet<u64>,
}

impl MockOperationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation confirms on its first receipt query
    pub fn confirming_immediately(keys: impl IntoIterator<Item = u64>) -> Self {
        Self::new().with_receipts(keys.into_iter().map(|key| (key, 1)))
    }

    pub fn with_receipts(mut self, script: impl IntoIterator<Item = (u64, u32)>) -> Self {
        self.receipt_after.extend(script);
        self
    }

    pub fn failing_build_for(mut self, key: u64) -> Self {
        self.failing_build_keys.insert(key);
        self
    }

    /// Reject sends for `key` the first `times` times it is sent
    pub fn rejecting_send_for(mut self, key: u64, times: u32) -> Self {
        self.rejected_send_key = Some(key);
        self.state.get_mut().unwrap().rejections_left = times;
        self
    }

    pub fn malformed_id_for(mut self, key: u64) -> Self {
        self.malformed_keys.insert(key);
        self
    }

    pub fn operation_id(key: u64) -> String {
        format!("0xuserop{key:04}")
    }

    fn key_of(id: &str) -> Option<u64> {
        id.strip_prefix("0xuserop")?.parse().ok()
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_builds(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SourceCall::Build(_)))
            .count()
    }

    pub fn count_sends(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SourceCall::Send(_)))
            .count()
    }

    pub fn receipt_queries(&self, id: &str) -> u32 {
        self.state
            .lock()
            .unwrap()
            .receipt_queries
            .get(id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ReceiptSource for MockOperationSource {
    type Id = String;
    type Receipt = MockReceipt;
    type Error = MockSourceError;

    async fn receipt_of(&self, id: &String) -> Result<Option<MockReceipt>, MockSourceError> {
        let queries = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(SourceCall::Receipt(id.clone()));
            let queries = state.receipt_queries.entry(id.clone()).or_insert(0);
            *queries += 1;
            *queries
        };

        let key = Self::key_of(id).ok_or_else(|| MockSourceError::Malformed(id.clone()))?;
        if self.malformed_keys.contains(&key) {
            return Err(MockSourceError::Malformed(id.clone()));
        }

        Ok(match self.receipt_after.get(&key) {
            Some(&after) if queries >= after => Some(MockReceipt {
                operation_id: id.clone(),
                success: true,
            }),
            _ => None,
        })
    }
}

#[async_trait]
impl OperationSource for MockOperationSource {
    type Built = BuiltOperation;

    async fn build(&self, sequencing_key: u64) -> Result<BuiltOperation, MockSourceError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(SourceCall::Build(sequencing_key));

        if self.failing_build_keys.contains(&sequencing_key) {
            return Err(MockSourceError::BuildFailed(sequencing_key));
        }

        Ok(BuiltOperation {
            sequencing_key,
            call_data: format!("transfer(0xrecipient, 1000, nonceKey={sequencing_key})"),
        })
    }

    async fn send(&self, operation: BuiltOperation) -> Result<String, MockSourceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SourceCall::Send(operation.sequencing_key));

        if self.rejected_send_key == Some(operation.sequencing_key) && state.rejections_left > 0 {
            state.rejections_left -= 1;
            return Err(MockSourceError::SendRejected(operation.sequencing_key));
        }

        Ok(Self::operation_id(operation.sequencing_key))
    }
}
