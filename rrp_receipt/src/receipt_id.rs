// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Content-addressed receipt identifiers
//!
//! Two photographs of the same physical receipt parse to the same
//! `(total amount, date, merchant name)` triple, so an identifier derived
//! from exactly those three fields collapses them to one submission. Line
//! items, addresses and the image bytes never feed the hash.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{parsed::ParsedReceipt, ReceiptError, ReceiptResult};

/// Number of lowercase hex characters kept from the SHA-256 digest.
///
/// 64 bits of identifier. At human-scale receipt volumes the collision
/// probability is negligible, and the short form stays usable as a key in
/// external stores; the truncation is a deliberate trade-off, not an
/// oversight.
pub const RECEIPT_ID_LEN: usize = 16;

const ID_DELIMITER: char = '|';

/// The deduplication key for a parsed receipt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(String);

impl ReceiptId {
    /// Derives the identifier from the three defining fields.
    ///
    /// The fields are joined with a fixed delimiter, hashed with SHA-256
    /// over their UTF-8 encoding, rendered as lowercase hex and truncated to
    /// [`RECEIPT_ID_LEN`] characters. Deterministic and free of side
    /// effects.
    pub fn compose(total_amount: &str, date: &str, merchant_name: &str) -> Self {
        let raw = format!("{total_amount}{ID_DELIMITER}{date}{ID_DELIMITER}{merchant_name}");
        let digest = Sha256::digest(raw.as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(RECEIPT_ID_LEN);
        ReceiptId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed receipt together with its composed identifier, in the shape the
/// receipt store persists: the full extraction result with the id inlined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReceipt {
    pub id: ReceiptId,
    #[serde(flatten)]
    pub receipt: ParsedReceipt,
}

impl StoredReceipt {
    /// Composes the identifier for `receipt` from its defining fields.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAReceipt`] when the total amount or date
    /// was not extracted; such a record must never be persisted or credited.
    ///
    pub fn from_parsed(receipt: ParsedReceipt) -> ReceiptResult<Self> {
        let (Some(total_amount), Some(date)) =
            (receipt.total_amount.data, receipt.date.data.as_deref())
        else {
            return Err(ReceiptError::NotAReceipt {
                missing: receipt.missing_fields().join(", "),
            });
        };
        // A missing merchant name hashes as the empty string.
        let merchant_name = receipt.merchant_name.data.as_deref().unwrap_or_default();
        let id = ReceiptId::compose(&render_amount(total_amount), date, merchant_name);
        Ok(Self { id, receipt })
    }
}

/// Renders an amount the way the service's JSON numerals read: shortest
/// round-trip form, no trailing zero fraction (`42.5 -> "42.5"`,
/// `42.0 -> "42"`).
fn render_amount(value: f64) -> String {
    format!("{value}")
}
