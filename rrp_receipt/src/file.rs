// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Receipt file model
//!
//! A [`ReceiptFile`] is the raw user selection: bytes, the media type the
//! host platform declared for them, and the file name. It only lives until
//! extraction completes or fails.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Largest file the workflow accepts, in bytes (20 MiB).
pub const MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;

/// Media types the extraction service accepts.
///
/// HEIC is special-cased elsewhere: several platforms misreport its MIME
/// type, so a `.heic` file name is accepted even when the declared type
/// does not parse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum MediaType {
    #[strum(to_string = "application/pdf")]
    Pdf,
    #[strum(to_string = "image/jpeg", serialize = "image/jpg")]
    Jpeg,
    #[strum(to_string = "image/png")]
    Png,
    #[strum(to_string = "image/gif")]
    Gif,
    #[strum(to_string = "image/heic")]
    Heic,
}

/// A candidate receipt file as selected by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptFile {
    file_name: String,
    declared_type: Option<String>,
    bytes: Vec<u8>,
}

impl ReceiptFile {
    /// Returns a file with the provided name, declared media type and content
    pub fn new(
        file_name: impl Into<String>,
        declared_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            declared_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Media type string as declared by the host platform, unparsed.
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The declared type parsed against the accepted set, if it parses at all.
    pub fn media_type(&self) -> Option<MediaType> {
        self.declared_type
            .as_deref()
            .and_then(|declared| MediaType::from_str(declared).ok())
    }

    /// Case-insensitive `.heic` file name fallback for misreported HEIC files.
    pub fn has_heic_extension(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".heic")
    }
}
