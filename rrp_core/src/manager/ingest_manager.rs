// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use log::debug;
use rrp_receipt::{
    checks::CheckList,
    file::ReceiptFile,
    receipt_id::{ReceiptId, StoredReceipt},
    CheckedFile, Context, FileWithState, ReceiptError,
};

use super::adapters::{CreditOutcome, ReceiptExtractor, ReceiptStore, RewardLedger, StoreOutcome};
use crate::{user::UserAccount, Error};

/// Points awarded for a credited receipt: a fixed base plus a fixed bonus
/// per extracted line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsSchedule {
    pub base_award: u64,
    pub line_item_bonus: u64,
}

impl Default for PointsSchedule {
    fn default() -> Self {
        Self {
            base_award: 10,
            line_item_bonus: 5,
        }
    }
}

impl PointsSchedule {
    pub fn award(&self, line_item_count: usize) -> u64 {
        self.base_award + self.line_item_bonus * line_item_count as u64
    }
}

/// Terminal result of a submission that completed without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The receipt was persisted and the ledger applied the points.
    Credited {
        receipt_id: ReceiptId,
        points_awarded: u64,
        new_total: u64,
    },
    /// The receipt's identifier was already known, either to the store or to
    /// the ledger. No points were added.
    Duplicate { receipt_id: ReceiptId },
}

pub struct Manager<E> {
    /// Context that implements the collaborator adapters
    context: E,

    /// Checks that must be completed for each selected file before it is
    /// sent for extraction
    checks: CheckList,

    /// How many points a credited receipt is worth
    points: PointsSchedule,
}

impl<E> Manager<E> {
    /// Creates new manager with provided `context`; any file submitted
    /// through this manager will complete all `checks` before being
    /// extracted, and credited receipts are valued per `points`.
    pub fn new(context: E, checks: impl Into<CheckList>, points: PointsSchedule) -> Self {
        Self {
            context,
            checks: checks.into(),
            points,
        }
    }

    /// Runs the file checks and transitions the file to `Checked`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the first failing check's reason;
    /// the session surfaces it without leaving the `Idle` state.
    ///
    pub async fn validate(&self, ctx: &Context, file: ReceiptFile) -> Result<CheckedFile, Error> {
        match FileWithState::new(file).finalize_checks(ctx, &self.checks).await {
            Ok(Ok(checked)) => Ok(checked),
            Ok(Err(failed)) => Err(Error::Validation(failed.error())),
            Err(retryable) => Err(Error::Validation(ReceiptError::RetryableCheck(retryable))),
        }
    }
}

impl<E> Manager<E>
where
    E: ReceiptExtractor + ReceiptStore + RewardLedger,
{
    /// Drives one file through the whole pipeline: validation, extraction,
    /// identifier composition, persistence and ledger credit.
    ///
    /// The three network calls run strictly in that order; extraction always
    /// completes before persistence is attempted, persistence before
    /// crediting. `user` is only mutated by a successful credit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] / [`Error::NotAReceipt`] for input the
    /// user must change, and [`Error::Extraction`] / [`Error::Store`] /
    /// [`Error::Ledger`] for transport failures that a retry can resolve.
    ///
    pub async fn submit(
        &self,
        ctx: &Context,
        file: ReceiptFile,
        user: &mut UserAccount,
    ) -> Result<SubmissionOutcome, Error> {
        let checked = self.validate(ctx, file).await?;
        self.submit_checked(checked, user).await
    }

    /// Same as [`Manager::submit`] from a file that already passed the
    /// checks. Retries of an already-selected file enter here so validation
    /// is not re-run.
    pub async fn submit_checked(
        &self,
        file: CheckedFile,
        user: &mut UserAccount,
    ) -> Result<SubmissionOutcome, Error> {
        let parsed = self
            .context
            .extract_receipt(&file)
            .await
            .map_err(|err| Error::Extraction {
                source_error: anyhow::Error::new(err),
            })?;

        let receipt = StoredReceipt::from_parsed(parsed).map_err(|err| match err {
            ReceiptError::NotAReceipt { missing } => Error::NotAReceipt { missing },
            other => Error::Validation(other),
        })?;
        debug!(
            "extracted receipt {} ({} line items)",
            receipt.id,
            receipt.receipt.line_item_count()
        );

        match self
            .context
            .store_receipt(user.id(), &receipt)
            .await
            .map_err(|err| Error::Store {
                source_error: anyhow::Error::new(err),
            })? {
            StoreOutcome::AlreadyExists => {
                // Expected on re-upload of the same physical receipt; no
                // crediting happens on this path.
                return Ok(SubmissionOutcome::Duplicate {
                    receipt_id: receipt.id,
                });
            }
            StoreOutcome::Stored => {}
        }

        self.credit(receipt, user).await
    }

    /// Re-enters the pipeline at the credit step for a receipt that is
    /// already persisted.
    ///
    /// Used internally after a successful store, and by retries after an
    /// [`Error::Ledger`] failure: the receipt exists in the store, so the
    /// retry must not re-run extraction or persistence. An identifier the
    /// ledger already recorded resolves as
    /// [`SubmissionOutcome::Duplicate`].
    pub async fn resume(
        &self,
        receipt: &StoredReceipt,
        user: &mut UserAccount,
    ) -> Result<SubmissionOutcome, Error> {
        self.credit(receipt.clone(), user).await
    }

    async fn credit(
        &self,
        receipt: StoredReceipt,
        user: &mut UserAccount,
    ) -> Result<SubmissionOutcome, Error> {
        let points_awarded = self.points.award(receipt.receipt.line_item_count());
        let new_total = user.points() + points_awarded;

        match self
            .context
            .credit(user.id(), &receipt.id, new_total)
            .await
        {
            Ok(CreditOutcome::Applied { total }) => {
                let receipt_id = receipt.id;
                user.apply_credit(receipt_id.clone(), total);
                debug!(
                    "credited {points_awarded} points for receipt {receipt_id}, total {}",
                    user.points()
                );
                Ok(SubmissionOutcome::Credited {
                    receipt_id,
                    points_awarded,
                    new_total: user.points(),
                })
            }
            Ok(CreditOutcome::AlreadyApplied) => Ok(SubmissionOutcome::Duplicate {
                receipt_id: receipt.id,
            }),
            Err(err) => Err(Error::Ledger {
                receipt: Box::new(receipt),
                source_error: anyhow::Error::new(err),
            }),
        }
    }
}
