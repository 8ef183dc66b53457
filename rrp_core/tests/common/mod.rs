// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures: extraction responses in the service's wire shape.

use rrp_receipt::parsed::ParsedReceipt;

/// The reference receipt: 42.50 USD at Cafe Luna with two line items.
pub fn cafe_luna_receipt() -> ParsedReceipt {
    serde_json::from_value(serde_json::json!({
        "totalAmount": {
            "data": 42.5,
            "confidenceLevel": 0.93,
            "text": "42.50",
            "currencyCode": "USD"
        },
        "date": { "data": "2024-01-15", "confidenceLevel": 0.88 },
        "merchantName": { "data": "Cafe Luna", "confidenceLevel": 0.8 },
        "merchantAddress": { "data": "12 Via Roma" },
        "confidenceLevel": 0.91,
        "entities": {
            "productLineItems": [
                {
                    "data": {
                        "name": { "data": "Espresso" },
                        "quantity": { "data": 2.0 },
                        "unitPrice": { "data": 2.5 },
                        "totalPrice": { "data": 5.0 }
                    }
                },
                {
                    "data": {
                        "name": { "data": "Cornetto" },
                        "quantity": { "data": 1.0 },
                        "totalPrice": { "data": 1.8 }
                    }
                }
            ]
        }
    }))
    .expect("fixture receipt deserializes")
}

/// An extraction result with an amount but no date: not a receipt.
pub fn no_date_receipt() -> ParsedReceipt {
    serde_json::from_value(serde_json::json!({
        "totalAmount": { "data": 12.0, "currencyCode": "EUR" },
        "merchantName": { "data": "Kiosk" }
    }))
    .expect("fixture receipt deserializes")
}

/// A valid receipt with no recognized line items.
pub fn bare_receipt() -> ParsedReceipt {
    serde_json::from_value(serde_json::json!({
        "totalAmount": { "data": 7.2, "currencyCode": "CHF" },
        "date": { "data": "2023-06-02" },
        "merchantName": { "data": "Denner" }
    }))
    .expect("fixture receipt deserializes")
}
