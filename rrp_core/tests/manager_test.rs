// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use rstest::*;

use rrp_core::{
    manager::{
        context::memory::{InMemoryContext, LedgerStorage, ReceiptStorage},
        Manager, PointsSchedule, SubmissionOutcome,
    },
    user::{Identity, UserAccount, UserId},
    Error,
};
use rrp_receipt::{checks::default_checks, file::ReceiptFile, Context, ReceiptError};

mod common;
use common::{bare_receipt, cafe_luna_receipt, no_date_receipt};

struct ContextFixture {
    context: InMemoryContext,
    manager: Manager<InMemoryContext>,
}

#[fixture]
fn context() -> ContextFixture {
    let receipt_storage: ReceiptStorage = Arc::new(RwLock::new(HashMap::new()));
    let ledger_storage: LedgerStorage = Arc::new(RwLock::new(HashMap::new()));
    let context = InMemoryContext::new(receipt_storage, ledger_storage);
    let manager = Manager::new(
        context.clone(),
        default_checks(),
        PointsSchedule::default(),
    );
    ContextFixture { context, manager }
}

#[fixture]
fn user() -> UserAccount {
    UserAccount::new(Identity {
        user_id: UserId::new("7411231"),
        display_name: Some("ada".to_owned()),
        avatar_url: None,
    })
}

#[fixture]
fn jpeg_file() -> ReceiptFile {
    ReceiptFile::new(
        "receipt.jpg",
        Some("image/jpeg".to_owned()),
        vec![0xffu8; 3 * 1024 * 1024],
    )
}

#[rstest]
#[tokio::test]
async fn submit_credits_once_then_reports_duplicate(
    context: ContextFixture,
    mut user: UserAccount,
    jpeg_file: ReceiptFile,
) {
    let ContextFixture { context, manager } = context;
    context.set_extraction_response(cafe_luna_receipt());

    let outcome = manager
        .submit(&Context::new(), jpeg_file.clone(), &mut user)
        .await
        .unwrap();

    let receipt_id = match outcome {
        SubmissionOutcome::Credited {
            receipt_id,
            points_awarded,
            new_total,
        } => {
            // base 10 plus 5 per line item, two items extracted
            assert_eq!(points_awarded, 20);
            assert_eq!(new_total, 20);
            receipt_id
        }
        other => panic!("expected Credited, got {other:?}"),
    };
    assert_eq!(user.points(), 20);
    assert!(user.has_receipt(&receipt_id));
    assert_eq!(context.ledger_total(user.id()), 20);
    assert_eq!(context.stored_receipt_count(), 1);

    // Same physical receipt again: the store conflicts, no credit happens.
    let outcome = manager
        .submit(&Context::new(), jpeg_file, &mut user)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Duplicate {
            receipt_id: receipt_id.clone()
        }
    );
    assert_eq!(user.points(), 20);
    assert_eq!(context.ledger_total(user.id()), 20);
    assert_eq!(context.stored_receipt_count(), 1);
}

#[rstest]
#[tokio::test]
async fn receipt_without_line_items_earns_the_base_award(
    context: ContextFixture,
    mut user: UserAccount,
    jpeg_file: ReceiptFile,
) {
    let ContextFixture { context, manager } = context;
    context.set_extraction_response(bare_receipt());

    let outcome = manager
        .submit(&Context::new(), jpeg_file, &mut user)
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        SubmissionOutcome::Credited {
            points_awarded: 10,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn missing_date_is_a_semantic_rejection(
    context: ContextFixture,
    mut user: UserAccount,
    jpeg_file: ReceiptFile,
) {
    let ContextFixture { context, manager } = context;
    context.set_extraction_response(no_date_receipt());

    let err = manager
        .submit(&Context::new(), jpeg_file, &mut user)
        .await
        .unwrap_err();
    match &err {
        Error::NotAReceipt { missing } => assert_eq!(missing, "date"),
        other => panic!("expected NotAReceipt, got {other:?}"),
    }
    assert!(!err.is_retryable());
    // nothing was persisted or credited
    assert_eq!(context.stored_receipt_count(), 0);
    assert_eq!(user.points(), 0);
}

#[rstest]
#[tokio::test]
async fn oversized_file_is_rejected_before_any_call(
    context: ContextFixture,
    mut user: UserAccount,
) {
    let ContextFixture { context, manager } = context;
    let oversized = ReceiptFile::new(
        "huge.jpg",
        Some("image/jpeg".to_owned()),
        vec![0u8; 21 * 1024 * 1024],
    );

    let err = manager
        .submit(&Context::new(), oversized, &mut user)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ReceiptError::FileTooLarge { .. })
    ));
    assert!(!err.is_retryable());
    assert_eq!(context.stored_receipt_count(), 0);
}

#[rstest]
#[tokio::test]
async fn extraction_transport_failure_is_retryable(
    context: ContextFixture,
    mut user: UserAccount,
    jpeg_file: ReceiptFile,
) {
    let ContextFixture { context, manager } = context;
    context.set_extraction_response(cafe_luna_receipt());
    context.fail_next_extraction();

    let err = manager
        .submit(&Context::new(), jpeg_file.clone(), &mut user)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Extraction { .. }));
    assert!(err.is_retryable());

    // the retry re-runs the whole pipeline and succeeds
    let outcome = manager
        .submit(&Context::new(), jpeg_file, &mut user)
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Credited { .. }));
}

#[rstest]
#[tokio::test]
async fn ledger_failure_resumes_at_the_credit_step(
    context: ContextFixture,
    mut user: UserAccount,
    jpeg_file: ReceiptFile,
) {
    let ContextFixture { context, manager } = context;
    context.set_extraction_response(cafe_luna_receipt());
    context.fail_next_credit();

    let err = manager
        .submit(&Context::new(), jpeg_file, &mut user)
        .await
        .unwrap_err();
    let receipt = match err {
        Error::Ledger { receipt, .. } => *receipt,
        other => panic!("expected Ledger, got {other:?}"),
    };
    // persisted, but not credited
    assert_eq!(context.stored_receipt_count(), 1);
    assert_eq!(user.points(), 0);

    // resume re-enters at the credit step: no second persist, one credit
    let outcome = manager.resume(&receipt, &mut user).await.unwrap();
    assert!(matches!(
        outcome,
        SubmissionOutcome::Credited {
            points_awarded: 20,
            ..
        }
    ));
    assert_eq!(context.stored_receipt_count(), 1);
    assert_eq!(user.points(), 20);
    assert_eq!(context.ledger_total(user.id()), 20);

    // resuming once more finds the identifier already applied
    let outcome = manager.resume(&receipt, &mut user).await.unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Duplicate { .. }));
    assert_eq!(user.points(), 20);
}
