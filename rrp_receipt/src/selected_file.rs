// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Module containing the selected file with metadata for tracking it through
//! validation
//!
//! A selected file must pass every configured check before it is allowed to
//! reach the extraction service. The `FileWithState` wrapper carries the file
//! through that lifecycle; only a `CheckedFile` can be extracted, so the
//! type system enforces that no unvalidated bytes ever leave the device.

use crate::{
    checks::{CheckError, FileCheck},
    file::ReceiptFile,
    state::{Checked, Checking, Failed, FileState},
    Context, ReceiptError, ReceiptResult,
};

pub type ValidationResult<S> = std::result::Result<FileWithState<S>, FileWithState<Failed>>;

/// A file that has passed every validation check.
pub type CheckedFile = FileWithState<Checked>;

/// Typestate pattern for tracking the state of a selected file
///
/// - The [`FileState`] trait represents the different states a file can be
///   in.
/// - The [`Checking`] state is used to represent a file whose checks are
///   still running.
/// - The [`Failed`] state is used to represent a file that has failed a
///   check.
/// - The [`Checked`] state is used to represent a file that has passed all
///   checks and may be sent for extraction.
#[derive(Debug, Clone)]
pub struct FileWithState<S>
where
    S: FileState,
{
    /// The file as selected by the user
    file: ReceiptFile,
    /// The current state of the file (checking, failed or checked)
    _state: S,
}

impl FileWithState<Checking> {
    /// Creates a new `FileWithState` in the `Checking` state
    pub fn new(file: ReceiptFile) -> FileWithState<Checking> {
        FileWithState {
            file,
            _state: Checking,
        }
    }

    /// Performs a list of checks on the file
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::CheckFailure`] if any check rejects the file,
    /// or [`ReceiptError::RetryableCheck`] if a check could not complete.
    ///
    pub async fn perform_checks(
        &mut self,
        ctx: &Context,
        checks: &[FileCheck],
    ) -> ReceiptResult<()> {
        for check in checks {
            // return early on an error
            check.check(ctx, self).await.map_err(|e| match e {
                CheckError::Retryable(e) => ReceiptError::RetryableCheck(e.to_string()),
                CheckError::Failed(e) => match e.downcast::<ReceiptError>() {
                    Ok(receipt_error) => receipt_error,
                    Err(other) => ReceiptError::CheckFailure(other.to_string()),
                },
            })?;
        }
        Ok(())
    }

    /// Completes all checks and transitions the file to the next state
    ///
    /// Returns `Err` with a [`FileWithState<Failed>`] in case of error,
    /// returns `Ok` with a [`FileWithState<Checked>`] in case of success.
    ///
    pub async fn finalize_checks(
        mut self,
        ctx: &Context,
        checks: &[FileCheck],
    ) -> Result<ValidationResult<Checked>, String> {
        let all_checks_passed = self.perform_checks(ctx, checks).await;
        if let Err(ReceiptError::RetryableCheck(e)) = all_checks_passed {
            Err(e)
        } else if let Err(e) = all_checks_passed {
            Ok(Err(self.perform_state_error(e)))
        } else {
            let checked = self.perform_state_changes(Checked);
            Ok(Ok(checked))
        }
    }
}

impl FileWithState<Failed> {
    pub fn error(self) -> ReceiptError {
        self._state.error
    }
}

impl<S> FileWithState<S>
where
    S: FileState,
{
    pub(super) fn perform_state_error(self, error: ReceiptError) -> FileWithState<Failed> {
        FileWithState {
            file: self.file,
            _state: Failed { error },
        }
    }

    fn perform_state_changes<T>(self, new_state: T) -> FileWithState<T>
    where
        T: FileState,
    {
        FileWithState {
            file: self.file,
            _state: new_state,
        }
    }

    /// Returns the underlying file
    pub fn file(&self) -> &ReceiptFile {
        &self.file
    }
}
