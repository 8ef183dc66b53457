// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use rrp_receipt::{parsed::ParsedReceipt, CheckedFile};

/// Sends a validated file to the external extraction service.
///
/// # Example
///
/// For example code see [crate::manager::context::memory::InMemoryContext]
#[async_trait]
pub trait ReceiptExtractor {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Submits `file` for extraction and returns the structured result.
    ///
    /// The service is billed and rate-limited per call, so implementations
    /// must perform exactly one attempt and never retry internally; retrying
    /// is a user-initiated action at the manager level. Whether the result
    /// is semantically a receipt is judged by the caller, not here.
    async fn extract_receipt(&self, file: &CheckedFile)
        -> Result<ParsedReceipt, Self::AdapterError>;
}
