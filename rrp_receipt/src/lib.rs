// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Receipt files, parsed receipts and identifiers
//!
//! A user submits a photograph or PDF of a purchase receipt. The file is
//! validated locally, sent to an external extraction service, and the parsed
//! result is deduplicated by a content-addressed identifier so the same
//! physical receipt is only ever rewarded once.
//!
//! A list of checks is performed on the selected file before it is allowed to
//! reach the extraction service. Each file is wrapped into a state machine
//! that can be in one of the following states:
//! - `Checking`: the file's validation checks are still running.
//! - `Failed`: the file has failed a check.
//! - `Checked`: the file has passed every check and may be extracted.

pub mod checks;
mod error;
pub mod file;
pub mod parsed;
pub mod receipt_id;
mod selected_file;
pub mod state;

pub use error::ReceiptError;
pub use selected_file::{CheckedFile, FileWithState, ValidationResult};

/// Result type for receipt files
pub type ReceiptResult<T> = Result<T, ReceiptError>;

/// Extra information for [checks::Check]
pub type Context = anymap3::Map<dyn std::any::Any + Send + Sync>;
