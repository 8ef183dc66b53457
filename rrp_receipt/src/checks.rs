// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # File Checks
//!
//! Checks validate a selected file before it is allowed to reach the
//! extraction service. To create a check, implement the `Check` trait into a
//! struct.
//!
//! ## Example
//!
//! ```rust
//! # use std::sync::Arc;
//! use rrp_receipt::{
//!     checks::{Check, CheckResult, FileCheck},
//!     state::Checking,
//!     Context, FileWithState,
//! };
//! # use async_trait::async_trait;
//!
//! struct MyCheck;
//!
//! #[async_trait]
//! impl Check for MyCheck {
//!     async fn check(&self, ctx: &Context, file: &FileWithState<Checking>) -> CheckResult {
//!         // Implement your check here
//!         Ok(())
//!     }
//! }
//!
//! let my_check: FileCheck = Arc::new(MyCheck);
//! ```

use std::{ops::Deref, sync::Arc};

use super::{state::Checking, Context, FileWithState, ReceiptError};
use crate::file::MAX_FILE_BYTES;

/// FileCheck is a type alias for an Arc of a struct that implements the `Check` trait.
pub type FileCheck = Arc<dyn Check + Sync + Send>;

/// Result of a check operation. It uses the `anyhow` crate to handle errors.
pub type CheckResult = Result<(), CheckError>;

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Retryable(anyhow::Error),
    #[error(transparent)]
    Failed(anyhow::Error),
}

/// CheckList is a NewType pattern to store a list of checks.
/// It is a wrapper around an Arc of FileCheck[].
pub struct CheckList(Arc<[FileCheck]>);

impl CheckList {
    pub fn new(checks: Vec<FileCheck>) -> Self {
        Self(checks.into())
    }

    pub fn empty() -> Self {
        Self(Arc::new([]))
    }
}

impl Deref for CheckList {
    type Target = [FileCheck];

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl From<Vec<FileCheck>> for CheckList {
    fn from(checks: Vec<FileCheck>) -> Self {
        Self::new(checks)
    }
}

/// Check trait is implemented by the lib user to validate files before they
/// are sent for extraction.
#[async_trait::async_trait]
pub trait Check {
    async fn check(&self, ctx: &Context, file: &FileWithState<Checking>) -> CheckResult;
}

/// Provides a built-in check that rejects files over a byte limit.
///
/// The rejection reason carries the measured size so it can be surfaced to
/// the user verbatim.
#[derive(Debug)]
pub struct FileSizeCheck {
    limit_bytes: u64,
}

impl FileSizeCheck {
    pub fn new(limit_bytes: u64) -> Self {
        Self { limit_bytes }
    }
}

impl Default for FileSizeCheck {
    fn default() -> Self {
        Self::new(MAX_FILE_BYTES)
    }
}

#[async_trait::async_trait]
impl Check for FileSizeCheck {
    async fn check(&self, _: &Context, file: &FileWithState<Checking>) -> CheckResult {
        let size_bytes = file.file().size_bytes();
        if size_bytes > self.limit_bytes {
            return Err(CheckError::Failed(
                ReceiptError::FileTooLarge {
                    size_bytes,
                    limit_bytes: self.limit_bytes,
                }
                .into(),
            ));
        }
        Ok(())
    }
}

/// Provides a built-in check that accepts files whose declared media type is
/// in the supported set, with a case-insensitive `.heic` file name fallback.
///
/// The dual check exists because some platforms misreport HEIC's media type;
/// the file name is the only reliable signal there.
#[derive(Debug, Default)]
pub struct MediaTypeCheck;

#[async_trait::async_trait]
impl Check for MediaTypeCheck {
    async fn check(&self, _: &Context, file: &FileWithState<Checking>) -> CheckResult {
        let file = file.file();
        if file.media_type().is_some() || file.has_heic_extension() {
            return Ok(());
        }
        Err(CheckError::Failed(
            ReceiptError::UnsupportedMediaType {
                declared: file.declared_type().unwrap_or("none").to_owned(),
                file_name: file.file_name().to_owned(),
            }
            .into(),
        ))
    }
}

/// The checks every submission runs: size cap and media type.
pub fn default_checks() -> CheckList {
    CheckList::new(vec![
        Arc::new(FileSizeCheck::default()),
        Arc::new(MediaTypeCheck),
    ])
}
