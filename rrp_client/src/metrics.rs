// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Submission counters, registered in the default prometheus registry so an
//! embedding host can expose them however it already exposes metrics.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};

lazy_static! {
    pub static ref RECEIPTS_SUBMITTED: IntCounter = register_int_counter!(
        "rrp_receipts_submitted_total",
        "Receipts submitted for processing"
    )
    .unwrap();
    pub static ref RECEIPTS_CREDITED: IntCounter = register_int_counter!(
        "rrp_receipts_credited_total",
        "Receipts that were persisted and credited"
    )
    .unwrap();
    pub static ref RECEIPTS_DUPLICATE: IntCounter = register_int_counter!(
        "rrp_receipts_duplicate_total",
        "Submissions that resolved to an already-known receipt"
    )
    .unwrap();
    pub static ref EXTRACTION_FAILURES: IntCounter = register_int_counter!(
        "rrp_extraction_failures_total",
        "Extraction calls that failed at the transport level"
    )
    .unwrap();
    pub static ref TRANSPORT_FAILURES: IntCounter = register_int_counter!(
        "rrp_transport_failures_total",
        "Submissions that ended in a retryable transport failure"
    )
    .unwrap();
}
