// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use rrp_receipt::receipt_id::ReceiptId;

use crate::user::UserId;

/// Outcome of applying a credit against the reward ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Points were applied; `total` is the ledger's post-credit total.
    Applied { total: u64 },
    /// The identifier was already credited for this user; no points were
    /// added.
    AlreadyApplied,
}

/// Applies reward points against a user, idempotent on the receipt
/// identifier.
///
/// # Example
///
/// For example code see [crate::manager::context::memory::InMemoryContext]
#[async_trait]
pub trait RewardLedger {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Credits `user_id` up to `new_total` points, recording `receipt_id`.
    ///
    /// The ledger must treat `receipt_id` as an idempotency key: a second
    /// call with an identifier already recorded for the user returns
    /// [`CreditOutcome::AlreadyApplied`] and must not add points twice. The
    /// numeric total is client-computed and only trusted on a per-receipt
    /// basis.
    async fn credit(
        &self,
        user_id: &UserId,
        receipt_id: &ReceiptId,
        new_total: u64,
    ) -> Result<CreditOutcome, Self::AdapterError>;
}
