//! Processing status tracking.
//!
//! Every dataset has exactly one processing status row. All changes to it
//! happen inside a transaction so readers see either the old or the new
//! state. Concurrent writers are resolved by the database with the last
//! write winning.

#[cfg(test)]
mod tests;

use anyhow::anyhow;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use crate::database::entity::processing_status::{
    self, Entity as ProcessingStatus, ProcessingStatusModel,
};
use crate::database::PortalDatabase;
use crate::error::{ServerError, ServerResult};
use portal::api::v1::dataset::DatasetStatus;
use portal::status::{validate_upload_progress, ConversionStatus, UploadStatus, ValidationStatus};

/// A processing status to be stored for a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingStatusSpec {
    pub upload_status: UploadStatus,
    pub upload_progress: f64,
    pub upload_message: Option<String>,
    pub validation_status: Option<ValidationStatus>,
    pub validation_message: Option<String>,
    pub conversion_loom_status: Option<ConversionStatus>,
    pub conversion_rds_status: Option<ConversionStatus>,
    pub conversion_cxg_status: Option<ConversionStatus>,
    pub conversion_anndata_status: Option<ConversionStatus>,
}

impl Default for ProcessingStatusSpec {
    /// A dataset that is waiting for its upload to start.
    fn default() -> Self {
        Self {
            upload_status: UploadStatus::Waiting,
            upload_progress: 0.0,
            upload_message: None,
            validation_status: None,
            validation_message: None,
            conversion_loom_status: None,
            conversion_rds_status: None,
            conversion_cxg_status: None,
            conversion_anndata_status: None,
        }
    }
}

/// Creates the initial processing status of a new dataset.
pub async fn initialize<C: ConnectionTrait>(
    conn: &C,
    dataset_id: &str,
) -> ServerResult<ProcessingStatusModel> {
    replace(conn, dataset_id, ProcessingStatusSpec::default()).await
}

/// Replaces the processing status of a dataset.
///
/// The previous row, if any, is deleted. Call this within a transaction.
pub async fn replace<C: ConnectionTrait>(
    conn: &C,
    dataset_id: &str,
    new_status: ProcessingStatusSpec,
) -> ServerResult<ProcessingStatusModel> {
    validate_upload_progress(new_status.upload_progress)?;

    ProcessingStatus::delete_many()
        .filter(processing_status::Column::DatasetId.eq(dataset_id))
        .exec(conn)
        .await
        .map_err(ServerError::database_error)?;

    let now = Utc::now();
    let status = processing_status::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        dataset_id: Set(dataset_id.to_owned()),
        upload_status: Set(new_status.upload_status),
        upload_progress: Set(new_status.upload_progress),
        upload_message: Set(new_status.upload_message),
        validation_status: Set(new_status.validation_status),
        validation_message: Set(new_status.validation_message),
        conversion_loom_status: Set(new_status.conversion_loom_status),
        conversion_rds_status: Set(new_status.conversion_rds_status),
        conversion_cxg_status: Set(new_status.conversion_cxg_status),
        conversion_anndata_status: Set(new_status.conversion_anndata_status),
        created_at: Set(now),
        updated_at: Set(now),
    };

    status
        .insert(conn)
        .await
        .map_err(ServerError::database_error)
}

/// Returns the processing status of a dataset as shown to clients.
pub async fn read<C: PortalDatabase>(conn: &C, dataset_id: &str) -> ServerResult<DatasetStatus> {
    let status = load(conn, dataset_id).await?;
    Ok(status.to_api())
}

/// Requests the cancellation of an upload.
///
/// This only records the request. The ingestion worker stops the upload
/// and moves the dataset to CANCELLED. Requesting again is harmless.
#[instrument(skip(database))]
pub async fn request_cancel(
    database: &DatabaseConnection,
    dataset_id: &str,
) -> ServerResult<DatasetStatus> {
    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    let status = load(&txn, dataset_id).await?;

    if !status.upload_status.can_request_cancel() {
        return Err(ServerError::UploadComplete {
            dataset_id: dataset_id.to_owned(),
        });
    }

    let progress = status.upload_progress;
    let mut update = status.into_active_model();
    update.upload_status = Set(UploadStatus::CancelPending);
    update.upload_progress = Set(progress);
    update.updated_at = Set(Utc::now());

    let updated = update
        .update(&txn)
        .await
        .map_err(ServerError::database_error)?;

    txn.commit().await.map_err(ServerError::database_error)?;

    tracing::info!("Cancellation requested");

    Ok(updated.to_api())
}

/// Moves the upload of a dataset to a new state.
///
/// Used by the ingestion worker to report progress. Moving to UPLOADING
/// records `progress` when given, moving to UPLOADED completes the
/// progress, and other moves keep it.
#[instrument(skip(database))]
pub async fn advance(
    database: &DatabaseConnection,
    dataset_id: &str,
    next: UploadStatus,
    progress: Option<f64>,
) -> ServerResult<DatasetStatus> {
    if let Some(progress) = progress {
        validate_upload_progress(progress)?;
    }

    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    let status = load(&txn, dataset_id).await?;
    status.upload_status.check_transition(next)?;

    let progress = match next {
        UploadStatus::Uploading => progress.unwrap_or(status.upload_progress),
        UploadStatus::Uploaded => 1.0,
        _ => status.upload_progress,
    };

    let mut update = status.into_active_model();
    update.upload_status = Set(next);
    update.upload_progress = Set(progress);
    update.updated_at = Set(Utc::now());

    let updated = update
        .update(&txn)
        .await
        .map_err(ServerError::database_error)?;

    txn.commit().await.map_err(ServerError::database_error)?;

    Ok(updated.to_api())
}

async fn load<C: PortalDatabase>(conn: &C, dataset_id: &str) -> ServerResult<ProcessingStatusModel> {
    if let Some(status) = conn.find_processing_status(dataset_id).await? {
        return Ok(status);
    }

    // Distinguish a missing dataset from a broken one
    conn.find_dataset(dataset_id).await?;

    Err(ServerError::DatabaseError(anyhow!(
        "Dataset {} has no processing status",
        dataset_id
    )))
}
