// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Client for the backend receipt store and reward ledger endpoints.
//!
//! Both endpoints live behind the same base URL and speak plain JSON. A 409
//! from either is data, not an error: the store signals "identifier already
//! exists" and the ledger signals "identifier already credited", and both
//! resolve into the duplicate outcome upstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use rrp_core::{
    manager::adapters::{CreditOutcome, ReceiptStore, RewardLedger, StoreOutcome},
    user::UserId,
};
use rrp_receipt::receipt_id::{ReceiptId, StoredReceipt};
use serde::{Deserialize, Serialize};

use crate::error::{map_send_error, ClientError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreReceiptRequest<'a> {
    user_id: &'a UserId,
    receipt_data: &'a StoredReceipt,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreditRequest<'a> {
    user_id: &'a UserId,
    goals: u64,
    receipt_id: &'a ReceiptId,
}

/// The credit endpoint's response body is not contractually pinned; take the
/// total when present and fall back to what was requested.
#[derive(Deserialize, Default)]
struct CreditResponse {
    #[serde(default)]
    goals: Option<u64>,
}

/// Backend API client for both the receipt store and the ledger.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.endpoint(path);
        self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| map_send_error(&url, err))
    }
}

#[async_trait]
impl ReceiptStore for BackendClient {
    type AdapterError = ClientError;

    async fn store_receipt(
        &self,
        user_id: &UserId,
        receipt: &StoredReceipt,
    ) -> Result<StoreOutcome, Self::AdapterError> {
        let response = self
            .post_json(
                "receipts",
                &StoreReceiptRequest {
                    user_id,
                    receipt_data: receipt,
                },
            )
            .await?;

        match response.status() {
            StatusCode::CONFLICT => Ok(StoreOutcome::AlreadyExists),
            status if status.is_success() => Ok(StoreOutcome::Stored),
            status => Err(ClientError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl RewardLedger for BackendClient {
    type AdapterError = ClientError;

    async fn credit(
        &self,
        user_id: &UserId,
        receipt_id: &ReceiptId,
        new_total: u64,
    ) -> Result<CreditOutcome, Self::AdapterError> {
        let response = self
            .post_json(
                "credit-user",
                &CreditRequest {
                    user_id,
                    goals: new_total,
                    receipt_id,
                },
            )
            .await?;

        match response.status() {
            StatusCode::CONFLICT => Ok(CreditOutcome::AlreadyApplied),
            status if status.is_success() => {
                let body: CreditResponse = response.json().await.unwrap_or_default();
                Ok(CreditOutcome::Applied {
                    total: body.goals.unwrap_or(new_total),
                })
            }
            status => Err(ClientError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod request_wire_test {
    use rrp_receipt::parsed::{AmountField, Field, ParsedReceipt};

    use super::*;

    fn stored_receipt() -> StoredReceipt {
        StoredReceipt::from_parsed(ParsedReceipt {
            total_amount: AmountField {
                data: Some(42.5),
                currency_code: Some("USD".to_owned()),
                ..AmountField::default()
            },
            date: Field::from_data("2024-01-15".to_owned()),
            merchant_name: Field::from_data("Cafe Luna".to_owned()),
            ..ParsedReceipt::default()
        })
        .unwrap()
    }

    #[test]
    fn test_store_request_inlines_the_id_in_receipt_data() {
        let receipt = stored_receipt();
        let user_id = UserId::new("7411231");
        let value = serde_json::to_value(StoreReceiptRequest {
            user_id: &user_id,
            receipt_data: &receipt,
        })
        .unwrap();

        assert_eq!(value["userId"], "7411231");
        assert_eq!(value["receiptData"]["id"], "8655c892acc78d76");
        assert_eq!(value["receiptData"]["totalAmount"]["data"], 42.5);
    }

    #[test]
    fn test_credit_request_uses_the_wire_field_names() {
        let receipt = stored_receipt();
        let user_id = UserId::new("7411231");
        let value = serde_json::to_value(CreditRequest {
            user_id: &user_id,
            goals: 20,
            receipt_id: &receipt.id,
        })
        .unwrap();

        assert_eq!(value["userId"], "7411231");
        assert_eq!(value["goals"], 20);
        assert_eq!(value["receiptId"], "8655c892acc78d76");
    }
}
