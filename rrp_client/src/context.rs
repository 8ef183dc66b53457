// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! HTTP context: the three adapters wired to their real endpoints.

use async_trait::async_trait;
use rrp_core::{
    manager::adapters::{
        CreditOutcome, ReceiptExtractor, ReceiptStore, RewardLedger, StoreOutcome,
    },
    user::UserId,
};
use rrp_receipt::{
    parsed::ParsedReceipt,
    receipt_id::{ReceiptId, StoredReceipt},
    CheckedFile,
};

use crate::{backend::BackendClient, error::ClientError, extraction::ExtractionClient};

/// Context that implements every manager adapter over HTTP: extraction
/// against the OCR service, store and ledger against the backend API.
pub struct HttpContext {
    extraction: ExtractionClient,
    backend: BackendClient,
}

impl HttpContext {
    pub fn new(extraction: ExtractionClient, backend: BackendClient) -> Self {
        Self {
            extraction,
            backend,
        }
    }
}

#[async_trait]
impl ReceiptExtractor for HttpContext {
    type AdapterError = ClientError;

    async fn extract_receipt(
        &self,
        file: &CheckedFile,
    ) -> Result<ParsedReceipt, Self::AdapterError> {
        self.extraction.extract_receipt(file).await
    }
}

#[async_trait]
impl ReceiptStore for HttpContext {
    type AdapterError = ClientError;

    async fn store_receipt(
        &self,
        user_id: &UserId,
        receipt: &StoredReceipt,
    ) -> Result<StoreOutcome, Self::AdapterError> {
        self.backend.store_receipt(user_id, receipt).await
    }
}

#[async_trait]
impl RewardLedger for HttpContext {
    type AdapterError = ClientError;

    async fn credit(
        &self,
        user_id: &UserId,
        receipt_id: &ReceiptId,
        new_total: u64,
    ) -> Result<CreditOutcome, Self::AdapterError> {
        self.backend.credit(user_id, receipt_id, new_total).await
    }
}
