// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wire model for the extraction service's verbose response
//!
//! Every extracted value arrives wrapped in a `{data, confidenceLevel, text}`
//! envelope; amounts additionally carry a `currencyCode`. Only the fields the
//! workflow reads are modelled, everything else in the response is ignored on
//! deserialization.
//!
//! A response is a *valid receipt* only when both the total amount and the
//! transaction date were extracted. A response without them is a semantic
//! failure even though the transport call succeeded, and the two cases carry
//! different user messaging.

use serde::{Deserialize, Serialize};

/// One extracted value with its confidence metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field<T> {
    pub data: Option<T>,
    pub confidence_level: Option<f64>,
    pub text: Option<String>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self {
            data: None,
            confidence_level: None,
            text: None,
        }
    }
}

impl<T> Field<T> {
    pub fn from_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}

/// An extracted monetary value; the envelope of [`Field`] plus a currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmountField {
    pub data: Option<f64>,
    pub confidence_level: Option<f64>,
    pub text: Option<String>,
    pub currency_code: Option<String>,
}

/// One product line item as extracted from the receipt body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductLineItem {
    pub data: LineItemData,
    pub confidence_level: Option<f64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItemData {
    pub name: Field<String>,
    pub quantity: Field<f64>,
    pub unit_price: Field<f64>,
    pub total_price: Field<f64>,
}

/// Named entities the service recognized beyond the flat fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entities {
    pub product_line_items: Vec<ProductLineItem>,
}

/// A structured receipt record as returned by the extraction service.
///
/// Fields the workflow itself never reads (tax, paid amount, payment type,
/// items count, tracking id) are still carried so the persisted document
/// matches what the service returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedReceipt {
    pub total_amount: AmountField,
    pub tax_amount: AmountField,
    pub paid_amount: AmountField,
    pub date: Field<String>,
    pub merchant_name: Field<String>,
    pub merchant_address: Field<String>,
    pub payment_type: Field<String>,
    pub items_count: Field<f64>,
    pub confidence_level: Option<f64>,
    pub tracking_id: Option<String>,
    pub entities: Entities,
}

impl ParsedReceipt {
    /// Whether the record is a valid receipt: both total amount and date
    /// were extracted.
    pub fn is_receipt(&self) -> bool {
        self.total_amount.data.is_some() && self.date.data.is_some()
    }

    /// Names of the defining fields that were not extracted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.total_amount.data.is_none() {
            missing.push("totalAmount");
        }
        if self.date.data.is_none() {
            missing.push("date");
        }
        missing
    }

    pub fn line_item_count(&self) -> usize {
        self.entities.product_line_items.len()
    }
}

#[cfg(test)]
mod parsed_unit_test {
    use super::*;

    fn verbose_response() -> serde_json::Value {
        serde_json::json!({
            "totalAmount": {
                "data": 42.5,
                "confidenceLevel": 0.93,
                "text": "42.50",
                "currencyCode": "USD",
                "regions": []
            },
            "date": { "data": "2024-01-15", "confidenceLevel": 0.88, "text": "15/01/2024" },
            "merchantName": { "data": "Cafe Luna", "confidenceLevel": 0.8 },
            "merchantAddress": { "data": "12 Via Roma" },
            "confidenceLevel": 0.91,
            "trackingId": "b71c9b6f",
            "entities": {
                "productLineItems": [
                    {
                        "data": {
                            "name": { "data": "Espresso" },
                            "quantity": { "data": 2.0 },
                            "unitPrice": { "data": 2.5 },
                            "totalPrice": { "data": 5.0 }
                        },
                        "confidenceLevel": 0.7
                    },
                    {
                        "data": {
                            "name": { "data": "Cornetto" },
                            "quantity": { "data": 1.0 },
                            "totalPrice": { "data": 1.8 }
                        }
                    }
                ],
                "invoiceNumber": { "confidenceLevel": 0 }
            },
            "text": { "text": "CAFE LUNA\n...", "regions": [] },
            "location": { "city": { "geoname_id": 3165524 } }
        })
    }

    #[test]
    fn test_verbose_response_deserializes() {
        let receipt: ParsedReceipt = serde_json::from_value(verbose_response()).unwrap();
        assert!(receipt.is_receipt());
        assert_eq!(receipt.total_amount.data, Some(42.5));
        assert_eq!(receipt.total_amount.currency_code.as_deref(), Some("USD"));
        assert_eq!(receipt.date.data.as_deref(), Some("2024-01-15"));
        assert_eq!(receipt.merchant_name.data.as_deref(), Some("Cafe Luna"));
        assert_eq!(receipt.line_item_count(), 2);
        let first = &receipt.entities.product_line_items[0];
        assert_eq!(first.data.name.data.as_deref(), Some("Espresso"));
        assert_eq!(first.data.quantity.data, Some(2.0));
    }

    #[test]
    fn test_missing_date_is_not_a_receipt() {
        let mut value = verbose_response();
        value["date"] = serde_json::json!({ "confidenceLevel": 0 });
        let receipt: ParsedReceipt = serde_json::from_value(value).unwrap();
        assert!(!receipt.is_receipt());
        assert_eq!(receipt.missing_fields(), vec!["date"]);
    }

    #[test]
    fn test_empty_response_misses_both_fields() {
        let receipt: ParsedReceipt = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(receipt.missing_fields(), vec!["totalAmount", "date"]);
    }
}
