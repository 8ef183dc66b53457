// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # File State
//!
//! These are the implementation of the typestate pattern for tracking the
//! state of a selected file through validation.
//! The `FileState` trait represents the different states a file can be in.

use crate::ReceiptError;

/// Checking state represents a file whose validation checks are still running.
#[derive(Debug, Clone)]
pub struct Checking;

/// Failed state represents a file that has failed a validation check.
#[derive(Debug, Clone)]
pub struct Failed {
    /// The check failure that stopped validation
    pub error: ReceiptError,
}

/// Checked state represents a file that has passed every validation check.
#[derive(Debug, Clone)]
pub struct Checked;

/// Trait for the different states a file can be in.
pub trait FileState {}
impl FileState for Checking {}
impl FileState for Checked {}
impl FileState for Failed {}
