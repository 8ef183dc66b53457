// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Client for the external OCR/extraction service.
//!
//! The file is posted as multipart form data together with a fixed set of
//! extraction flags; the service answers with the verbose per-field JSON
//! that [`rrp_receipt::parsed::ParsedReceipt`] models. The service bills per
//! call, so this client performs exactly one attempt and leaves retrying to
//! the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use rrp_core::manager::adapters::ReceiptExtractor;
use rrp_receipt::{parsed::ParsedReceipt, CheckedFile};

use crate::{
    error::{map_send_error, ClientError},
    metrics,
};

/// Verbose per-field endpoint of the extraction service.
pub const DEFAULT_EXTRACTION_URL: &str = "https://api.taggun.io/api/receipt/v1/verbose/file";

/// Flags sent with every extraction call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionFlags {
    pub extract_time: bool,
    pub extract_line_items: bool,
    pub refresh: bool,
    pub incognito: bool,
}

impl Default for ExtractionFlags {
    fn default() -> Self {
        Self {
            extract_time: true,
            extract_line_items: true,
            refresh: false,
            incognito: false,
        }
    }
}

/// Extraction service client.
pub struct ExtractionClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    flags: ExtractionFlags,
}

impl ExtractionClient {
    /// Create a new extraction client against `url` authenticated by
    /// `api_key`.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ClientError> {
        // OCR on a 20 MiB upload can legitimately take a while; the overall
        // timeout is transport-level only, per-call semantics stay one-shot.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            flags: ExtractionFlags::default(),
        })
    }

    pub fn with_flags(mut self, flags: ExtractionFlags) -> Self {
        self.flags = flags;
        self
    }

    fn form(&self, file: &CheckedFile) -> Result<multipart::Form, ClientError> {
        let file = file.file();
        let mut part = multipart::Part::bytes(file.bytes().to_vec())
            .file_name(file.file_name().to_owned());
        if let Some(declared) = file.declared_type() {
            part = part.mime_str(declared).map_err(ClientError::Http)?;
        }
        Ok(multipart::Form::new()
            .part("file", part)
            .text("extractTime", self.flags.extract_time.to_string())
            .text("refresh", self.flags.refresh.to_string())
            .text("incognito", self.flags.incognito.to_string())
            .text(
                "extractLineItems",
                self.flags.extract_line_items.to_string(),
            ))
    }
}

#[async_trait]
impl ReceiptExtractor for ExtractionClient {
    type AdapterError = ClientError;

    async fn extract_receipt(
        &self,
        file: &CheckedFile,
    ) -> Result<ParsedReceipt, Self::AdapterError> {
        let response = self
            .client
            .post(&self.url)
            .header("accept", "application/json")
            .header("apikey", &self.api_key)
            .multipart(self.form(file)?)
            .send()
            .await
            .map_err(|err| {
                metrics::EXTRACTION_FAILURES.inc();
                map_send_error(&self.url, err)
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::EXTRACTION_FAILURES.inc();
            return Err(ClientError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|err| ClientError::Parse(err.to_string()))
    }
}
