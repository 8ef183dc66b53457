// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use rrp_receipt::receipt_id::StoredReceipt;

use crate::user::UserId;

/// Outcome of persisting a receipt document keyed by its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// First time this identifier was seen; the document was persisted.
    Stored,
    /// The identifier already exists. This is the expected outcome of
    /// re-uploading the same receipt, not an error.
    AlreadyExists,
}

/// Persists parsed receipts in the external receipt store.
///
/// # Example
///
/// For example code see [crate::manager::context::memory::InMemoryContext]
#[async_trait]
pub trait ReceiptStore {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Stores `receipt` for `user_id`, keyed by the receipt's identifier.
    ///
    /// A conflict on the identifier must be reported as
    /// [`StoreOutcome::AlreadyExists`], never as an `AdapterError`; the two
    /// drive entirely different user-visible outcomes.
    async fn store_receipt(
        &self,
        user_id: &UserId,
        receipt: &StoredReceipt,
    ) -> Result<StoreOutcome, Self::AdapterError>;
}
