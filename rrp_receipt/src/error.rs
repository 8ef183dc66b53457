// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Error type for receipt files and parsed receipts
#[derive(thiserror::Error, Debug, Clone, Serialize, Deserialize)]
pub enum ReceiptError {
    #[error("file is {size_bytes} bytes, over the {limit_bytes} byte limit")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("unsupported media type `{declared}` for file `{file_name}`")]
    UnsupportedMediaType { declared: String, file_name: String },
    #[error("parsed content is not a receipt, missing: {missing}")]
    NotAReceipt { missing: String },
    #[error("Issue encountered while performing check: {0}")]
    CheckFailure(String),
    #[error("Retryable check error encountered: {0}")]
    RetryableCheck(String),
}
