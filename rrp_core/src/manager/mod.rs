// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `manager` module provides facilities for driving a submitted receipt
//! through validation, extraction, deduplication and reward crediting.
//!
//! This module should be the primary interface for hosts that ingest
//! receipts. The `Manager` struct within this module lets the user specify
//! what checks a selected file must pass, and sequences the three external
//! calls so that a unique receipt is credited exactly once.
//!
//! The `Manager` uses user-defined adapters (see [adapters]) for extraction,
//! persistence and ledger handling. This design offers a high degree of
//! flexibility, letting the user define their own behavior for these
//! critical operations.

pub mod adapters;
#[cfg(feature = "in_memory")]
pub mod context;
mod ingest_manager;

pub use ingest_manager::{Manager, PointsSchedule, SubmissionOutcome};
