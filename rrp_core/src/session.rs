// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Workflow session state machine
//!
//! One session covers one user-visible attempt to upload and process a
//! single file, from selection to terminal outcome. The session publishes
//! its state over a watch channel so the UI and the wallet-gating logic can
//! observe transitions without being called back.
//!
//! The machine is `Idle → FileSelected → Processing → {Success, Duplicate,
//! Rejected, Failed}`. `Failed` and `Rejected` return to processing with the
//! same file on user retry; any terminal state returns to `Idle` on an
//! explicit clear. Only one `Processing` may be in flight per session.

use std::sync::{Arc, Mutex};

use log::debug;
use rrp_receipt::{
    file::ReceiptFile,
    receipt_id::{ReceiptId, StoredReceipt},
    CheckedFile, Context,
};
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    manager::{
        adapters::{ReceiptExtractor, ReceiptStore, RewardLedger},
        Manager, SubmissionOutcome,
    },
    user::UserAccount,
    Error,
};

/// Client-observable stages of one upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FileSelected,
    Processing,
    Success {
        receipt_id: ReceiptId,
        points_awarded: u64,
    },
    /// The receipt was already submitted. Neutral outcome, no error styling.
    Duplicate { receipt_id: ReceiptId },
    /// The input must change before another attempt can succeed.
    Rejected { reason: String },
    /// A transport failure; the same file can be retried.
    Failed { reason: String },
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Success { .. }
                | SessionState::Duplicate { .. }
                | SessionState::Rejected { .. }
                | SessionState::Failed { .. }
        )
    }
}

/// Wallet-connection precondition observed from the surrounding host.
///
/// A guard on `FileSelected → Processing`, not a state of this machine: the
/// machine never transitions on connection changes, it only refuses to start
/// processing while the gate is closed.
pub trait ConnectionGate {
    fn is_connected(&self) -> bool;
}

/// Always-open gate for hosts without a wallet precondition, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl ConnectionGate for OpenGate {
    fn is_connected(&self) -> bool {
        true
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("wallet is not connected")]
    GateClosed,
    #[error("no file selected")]
    NoFile,
    #[error("nothing to retry in the current state")]
    NothingToRetry,
}

#[derive(Default)]
struct Inner {
    /// Bumped on every clear; a completed call whose epoch no longer
    /// matches discards its result instead of mutating stale state.
    epoch: u64,
    file: Option<CheckedFile>,
    /// Receipt persisted but not yet credited; retries resume at the
    /// credit step instead of re-running extraction or persistence.
    pending: Option<StoredReceipt>,
}

/// One upload session. Cheap to clone; clones share state, so a detached
/// task can finish an in-flight submission while the UI observes the same
/// channel.
#[derive(Clone)]
pub struct Session {
    state: watch::Sender<SessionState>,
    inner: Arc<Mutex<Inner>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            state,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Current state, cloned out of the channel.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Validates `file` and moves to `FileSelected`.
    ///
    /// An invalid selection keeps the current state and returns the
    /// rejection reason for the UI to surface.
    pub async fn select_file<E>(
        &self,
        manager: &Manager<E>,
        ctx: &Context,
        file: ReceiptFile,
    ) -> Result<(), Error> {
        let checked = manager.validate(ctx, file).await?;
        let mut inner = self.inner.lock().unwrap();
        // a new selection starts a new attempt; an older in-flight result
        // must not land on it
        inner.epoch += 1;
        inner.file = Some(checked);
        inner.pending = None;
        self.state.send_replace(SessionState::FileSelected);
        Ok(())
    }

    /// Drives `FileSelected → Processing → terminal`.
    ///
    /// Returns without effect when a submission is already in flight. A
    /// closed gate refuses to start and leaves the state untouched. The
    /// terminal state is observed through the watch channel, not returned.
    pub async fn process<E, G>(
        &self,
        manager: &Manager<E>,
        gate: &G,
        user: &mut UserAccount,
    ) -> Result<(), SessionError>
    where
        E: ReceiptExtractor + ReceiptStore + RewardLedger,
        G: ConnectionGate + ?Sized,
    {
        if !gate.is_connected() {
            return Err(SessionError::GateClosed);
        }

        let (epoch, file, pending) = {
            let inner = self.inner.lock().unwrap();
            if matches!(*self.state.borrow(), SessionState::Processing) {
                // one Processing per session; re-submission is a no-op
                return Ok(());
            }
            let Some(file) = inner.file.clone() else {
                return Err(SessionError::NoFile);
            };
            (inner.epoch, file, inner.pending.clone())
        };
        self.state.send_replace(SessionState::Processing);

        let result = match &pending {
            Some(receipt) => manager.resume(receipt, user).await,
            None => manager.submit_checked(file, user).await,
        };
        self.commit(epoch, result);
        Ok(())
    }

    /// `Failed | Rejected → Processing` with the retained file, skipping
    /// re-validation. When the previous attempt already persisted the
    /// receipt, the retry resumes directly at the credit step.
    pub async fn retry<E, G>(
        &self,
        manager: &Manager<E>,
        gate: &G,
        user: &mut UserAccount,
    ) -> Result<(), SessionError>
    where
        E: ReceiptExtractor + ReceiptStore + RewardLedger,
        G: ConnectionGate + ?Sized,
    {
        if !matches!(
            *self.state.borrow(),
            SessionState::Failed { .. } | SessionState::Rejected { .. }
        ) {
            return Err(SessionError::NothingToRetry);
        }
        self.state.send_replace(SessionState::FileSelected);
        self.process(manager, gate, user).await
    }

    /// Any state → `Idle`. The file and any partially-completed receipt are
    /// dropped. An in-flight call is allowed to run to completion in the
    /// background, but its result is discarded.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.epoch += 1;
        inner.file = None;
        inner.pending = None;
        self.state.send_replace(SessionState::Idle);
    }

    fn commit(&self, epoch: u64, result: Result<SubmissionOutcome, Error>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch {
            debug!("session cleared while a submission was in flight, result discarded");
            return;
        }
        let next = match result {
            Ok(SubmissionOutcome::Credited {
                receipt_id,
                points_awarded,
                ..
            }) => {
                inner.file = None;
                inner.pending = None;
                SessionState::Success {
                    receipt_id,
                    points_awarded,
                }
            }
            Ok(SubmissionOutcome::Duplicate { receipt_id }) => {
                inner.file = None;
                inner.pending = None;
                SessionState::Duplicate { receipt_id }
            }
            Err(err) => {
                if let Error::Ledger { receipt, .. } = &err {
                    inner.pending = Some((**receipt).clone());
                }
                let reason = err.to_string();
                if err.is_retryable() {
                    SessionState::Failed { reason }
                } else {
                    SessionState::Rejected { reason }
                }
            }
        };
        self.state.send_replace(next);
    }
}
