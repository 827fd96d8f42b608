use super::*;

use tokio_test::{assert_err, assert_ok};

use crate::database::datasets::{self, NewDataset};
use crate::testing::{insert_collection, insert_dataset, test_database, OWNER};
use portal::collection::Visibility;
use portal::error::PortalError;

#[tokio::test]
async fn test_initialize() {
    let db = test_database().await;
    insert_collection(&db, "c1", Visibility::Private, OWNER).await;

    let dataset = datasets::create_dataset(&db, "c1", Visibility::Private, NewDataset::default())
        .await
        .unwrap();

    let status = assert_ok!(read(&db, &dataset.id).await);
    assert_eq!(UploadStatus::Waiting, status.upload_status);
    assert_eq!(0.0, status.upload_progress);
    assert_eq!(None, status.validation_status);
}

#[tokio::test]
async fn test_cancel_preserves_progress() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;

    for (state, progress) in [(UploadStatus::Waiting, 0.0), (UploadStatus::Uploading, 0.37)] {
        let dataset = insert_dataset(&db, &collection, state, progress).await;

        let status = assert_ok!(request_cancel(&db, &dataset.id).await);
        assert_eq!(UploadStatus::CancelPending, status.upload_status);
        assert_eq!(progress, status.upload_progress);

        let stored = assert_ok!(read(&db, &dataset.id).await);
        assert_eq!(status, stored);
    }
}

#[tokio::test]
async fn test_cancel_uploaded() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Uploaded, 1.0).await;

    let before = db.find_processing_status(&dataset.id).await.unwrap();

    let err = assert_err!(request_cancel(&db, &dataset.id).await);
    assert!(matches!(err, ServerError::UploadComplete { .. }));

    let after = db.find_processing_status(&dataset.id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_cancel_missing_dataset() {
    let db = test_database().await;

    let err = assert_err!(request_cancel(&db, "no-such-dataset").await);
    assert!(matches!(err, ServerError::NoSuchDataset));
}

#[tokio::test]
async fn test_advance() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Waiting, 0.0).await;

    let status = assert_ok!(advance(&db, &dataset.id, UploadStatus::Uploading, Some(0.25)).await);
    assert_eq!(UploadStatus::Uploading, status.upload_status);
    assert_eq!(0.25, status.upload_progress);

    // Progress is kept when not reported
    let status = assert_ok!(advance(&db, &dataset.id, UploadStatus::Uploading, None).await);
    assert_eq!(0.25, status.upload_progress);

    let status = assert_ok!(advance(&db, &dataset.id, UploadStatus::Uploaded, None).await);
    assert_eq!(UploadStatus::Uploaded, status.upload_status);
    assert_eq!(1.0, status.upload_progress);

    let err = assert_err!(advance(&db, &dataset.id, UploadStatus::Failed, None).await);
    assert!(matches!(
        err,
        ServerError::PortalError(PortalError::InvalidUploadTransition {
            from: UploadStatus::Uploaded,
            to: UploadStatus::Failed,
        })
    ));
}

#[tokio::test]
async fn test_advance_cancellation() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Uploading, 0.6).await;

    assert_ok!(request_cancel(&db, &dataset.id).await);

    let err = assert_err!(advance(&db, &dataset.id, UploadStatus::Uploading, Some(0.7)).await);
    assert!(matches!(err, ServerError::PortalError(_)));

    let status = assert_ok!(advance(&db, &dataset.id, UploadStatus::Cancelled, None).await);
    assert_eq!(UploadStatus::Cancelled, status.upload_status);
    assert_eq!(0.6, status.upload_progress);
}

#[tokio::test]
async fn test_reject_bad_progress() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Waiting, 0.0).await;

    let err = assert_err!(advance(&db, &dataset.id, UploadStatus::Uploading, Some(1.5)).await);
    assert!(matches!(
        err,
        ServerError::PortalError(PortalError::InvalidUploadProgress { .. })
    ));

    let new_status = ProcessingStatusSpec {
        upload_progress: -0.1,
        ..Default::default()
    };
    assert_err!(replace(&db, &dataset.id, new_status).await);

    // The rejected writes left the status alone
    let status = assert_ok!(read(&db, &dataset.id).await);
    assert_eq!(UploadStatus::Waiting, status.upload_status);
}
