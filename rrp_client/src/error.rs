// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors that can occur when talking to the extraction service or the
/// backend endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Folds connect errors into their own variant so the CLI can tell
/// "service down" apart from other transport failures.
pub(crate) fn map_send_error(url: &str, err: reqwest::Error) -> ClientError {
    if err.is_connect() {
        ClientError::Connection(format!("Cannot connect to {url}"))
    } else {
        ClientError::Http(err)
    }
}
