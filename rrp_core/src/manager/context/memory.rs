// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory context implementation for the ingestion manager.
//!
//! This module provides an in-memory implementation of all three adapters.
//! It is useful for testing and development purposes: the extraction
//! response is scripted rather than produced by a real service, and each
//! collaborator call can be made to fail exactly once to exercise the
//! partial-failure paths without a network.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};

use async_trait::async_trait;
use rrp_receipt::{
    parsed::ParsedReceipt,
    receipt_id::{ReceiptId, StoredReceipt},
    CheckedFile,
};
use thiserror::Error;

use crate::{
    manager::adapters::{
        CreditOutcome, ReceiptExtractor, ReceiptStore, RewardLedger, StoreOutcome,
    },
    user::UserId,
};

pub type ReceiptStorage = Arc<RwLock<HashMap<ReceiptId, StoredReceipt>>>;
pub type LedgerStorage = Arc<RwLock<HashMap<UserId, LedgerEntry>>>;

/// One user's row in the in-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerEntry {
    pub total: u64,
    pub credited: HashSet<ReceiptId>,
}

#[derive(Debug, Error)]
pub enum InMemoryError {
    #[error("something went wrong: {error}")]
    AdapterError { error: String },
}

#[derive(Clone)]
pub struct InMemoryContext {
    /// local receipt store with rwlocks to allow sharing with other
    /// components as needed
    receipt_storage: ReceiptStorage,
    ledger_storage: LedgerStorage,
    extraction_response: Arc<RwLock<Option<ParsedReceipt>>>,
    extraction_delay: Arc<RwLock<Option<Duration>>>,
    fail_extraction: Arc<AtomicBool>,
    fail_store: Arc<AtomicBool>,
    fail_credit: Arc<AtomicBool>,
}

impl InMemoryContext {
    pub fn new(receipt_storage: ReceiptStorage, ledger_storage: LedgerStorage) -> Self {
        InMemoryContext {
            receipt_storage,
            ledger_storage,
            extraction_response: Arc::new(RwLock::new(None)),
            extraction_delay: Arc::new(RwLock::new(None)),
            fail_extraction: Arc::new(AtomicBool::new(false)),
            fail_store: Arc::new(AtomicBool::new(false)),
            fail_credit: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Scripts the result of the next extraction calls.
    pub fn set_extraction_response(&self, receipt: ParsedReceipt) {
        *self.extraction_response.write().unwrap() = Some(receipt);
    }

    /// Adds artificial latency to extraction calls, for tests that need to
    /// interleave with an in-flight submission.
    pub fn set_extraction_delay(&self, delay: Duration) {
        *self.extraction_delay.write().unwrap() = Some(delay);
    }

    /// Makes the next extraction call fail with a transport error.
    pub fn fail_next_extraction(&self) {
        self.fail_extraction.store(true, Ordering::SeqCst);
    }

    /// Makes the next store call fail with a transport error.
    pub fn fail_next_store(&self) {
        self.fail_store.store(true, Ordering::SeqCst);
    }

    /// Makes the next credit call fail with a transport error.
    pub fn fail_next_credit(&self) {
        self.fail_credit.store(true, Ordering::SeqCst);
    }

    pub fn stored_receipt_count(&self) -> usize {
        self.receipt_storage.read().unwrap().len()
    }

    pub fn ledger_total(&self, user_id: &UserId) -> u64 {
        self.ledger_storage
            .read()
            .unwrap()
            .get(user_id)
            .map(|entry| entry.total)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReceiptExtractor for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn extract_receipt(
        &self,
        _file: &CheckedFile,
    ) -> Result<ParsedReceipt, Self::AdapterError> {
        let delay = *self.extraction_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_extraction.swap(false, Ordering::SeqCst) {
            return Err(InMemoryError::AdapterError {
                error: "extraction transport failure".to_owned(),
            });
        }
        self.extraction_response
            .read()
            .unwrap()
            .clone()
            .ok_or(InMemoryError::AdapterError {
                error: "No extraction response scripted".to_owned(),
            })
    }
}

#[async_trait]
impl ReceiptStore for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn store_receipt(
        &self,
        _user_id: &UserId,
        receipt: &StoredReceipt,
    ) -> Result<StoreOutcome, Self::AdapterError> {
        if self.fail_store.swap(false, Ordering::SeqCst) {
            return Err(InMemoryError::AdapterError {
                error: "store transport failure".to_owned(),
            });
        }
        let mut receipt_storage = self.receipt_storage.write().unwrap();
        if receipt_storage.contains_key(&receipt.id) {
            return Ok(StoreOutcome::AlreadyExists);
        }
        receipt_storage.insert(receipt.id.clone(), receipt.clone());
        Ok(StoreOutcome::Stored)
    }
}

#[async_trait]
impl RewardLedger for InMemoryContext {
    type AdapterError = InMemoryError;

    async fn credit(
        &self,
        user_id: &UserId,
        receipt_id: &ReceiptId,
        new_total: u64,
    ) -> Result<CreditOutcome, Self::AdapterError> {
        if self.fail_credit.swap(false, Ordering::SeqCst) {
            return Err(InMemoryError::AdapterError {
                error: "credit transport failure".to_owned(),
            });
        }
        let mut ledger_storage = self.ledger_storage.write().unwrap();
        let entry = ledger_storage.entry(user_id.clone()).or_default();
        if entry.credited.contains(receipt_id) {
            return Ok(CreditOutcome::AlreadyApplied);
        }
        // The numeric total is trusted per receipt; the identifier set is
        // what makes the operation idempotent.
        entry.total = new_total;
        entry.credited.insert(receipt_id.clone());
        Ok(CreditOutcome::Applied { total: entry.total })
    }
}
