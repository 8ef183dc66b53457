// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use rrp_receipt::{receipt_id::StoredReceipt, ReceiptError};
use thiserror::Error;

/// Failure kinds of the ingestion pipeline.
///
/// Every adapter failure is caught at the manager boundary and translated
/// into one of these before it reaches the session; raw transport errors
/// never surface past this type.
#[derive(Error, Debug)]
pub enum Error {
    /// The selected file failed a validation check. Not retryable without a
    /// different file.
    #[error(transparent)]
    Validation(#[from] ReceiptError),
    /// Extraction succeeded over the wire but the content is not a receipt.
    /// Not retryable without a different photo.
    #[error("parsed content is not a receipt, missing: {missing}")]
    NotAReceipt { missing: String },
    /// Transport failure while calling the extraction service. Retryable by
    /// resubmitting the same file.
    #[error("extraction call failed: {source_error}")]
    Extraction { source_error: anyhow::Error },
    /// Transport failure while persisting the receipt. Retryable by
    /// resubmitting the same file.
    #[error("receipt store call failed: {source_error}")]
    Store { source_error: anyhow::Error },
    /// The receipt was persisted but the ledger credit did not complete.
    /// Retry must re-enter at the credit step with the carried receipt so
    /// the reward is neither lost nor double-persisted.
    #[error("ledger credit for receipt {} failed: {source_error}", .receipt.id)]
    Ledger {
        receipt: Box<StoredReceipt>,
        source_error: anyhow::Error,
    },
}

impl Error {
    /// Whether re-invoking the pipeline with the same input can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Extraction { .. } | Error::Store { .. } | Error::Ledger { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
