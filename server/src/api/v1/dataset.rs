//! Dataset endpoints.

use anyhow::anyhow;
use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use tracing::instrument;

use crate::database::{datasets, PortalDatabase};
use crate::error::{ServerError, ServerResult};
use crate::status;
use crate::storage::RemoteFile;
use crate::{RequestState, State};
use portal::api::v1::dataset::{
    ArtifactSpec, CreateDatasetRequest, DatasetAssetLink, DatasetResponse, DatasetStatus,
    UpdateDatasetRequest,
};
use portal::collection::Visibility;

/// Returns a download link for an artifact of a dataset.
///
/// Artifacts of datasets are downloadable by anyone holding the
/// identifiers, so missing resources are reported as such.
#[instrument(skip_all, fields(dataset_id, asset_id))]
pub(crate) async fn get_dataset_asset(
    Extension(state): Extension<State>,
    Path((dataset_id, asset_id)): Path<(String, String)>,
) -> ServerResult<Json<DatasetAssetLink>> {
    let database = state.database().await?;

    database.find_dataset(&dataset_id).await?;
    let artifact = database.find_artifact(&dataset_id, &asset_id).await?;

    let file: RemoteFile = artifact.s3_uri.parse().map_err(|e| {
        tracing::error!("Artifact {} has a bad location: {}", artifact.id, e);
        ServerError::AssetUnavailable
    })?;

    let storage = state.storage().await?;

    let file_size = match storage.object_size(&file).await {
        Ok(Some(0)) => {
            tracing::error!("Object {} of artifact {} is empty", file, artifact.id);
            return Err(ServerError::AssetUnavailable);
        }
        Ok(Some(size)) => size,
        Ok(None) => {
            tracing::error!("Object {} of artifact {} is missing", file, artifact.id);
            return Err(ServerError::AssetUnavailable);
        }
        Err(e) => {
            tracing::error!("Failed to look up object {}: {}", file, e);
            return Err(ServerError::AssetUnavailable);
        }
    };

    let presigned_url = storage
        .presigned_url(&file, state.config.presigned_url_ttl)
        .await
        .map_err(|e| {
            tracing::error!("Failed to presign object {}: {}", file, e);
            ServerError::AssetUnavailable
        })?;

    Ok(Json(DatasetAssetLink {
        dataset_id,
        file_name: artifact.filename,
        file_size,
        presigned_url,
    }))
}

/// Returns the processing status of a dataset.
///
/// Requires permission to view the collection of the dataset.
#[instrument(skip_all, fields(dataset_id))]
pub(crate) async fn get_dataset_status(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Path(dataset_id): Path<String>,
) -> ServerResult<Json<DatasetStatus>> {
    let database = state.database().await?;

    req_state
        .auth
        .auth_dataset(database, &dataset_id, |_, _, permission| {
            permission.require_view()?;
            Ok(())
        })
        .await?;

    let status = status::read(database, &dataset_id).await?;

    Ok(Json(status))
}

/// Requests the cancellation of the upload of a dataset.
///
/// Requires permission to mutate the collection of the dataset. The
/// cancellation itself happens asynchronously.
#[instrument(skip_all, fields(dataset_id))]
pub(crate) async fn cancel_upload(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Path(dataset_id): Path<String>,
) -> ServerResult<(StatusCode, Json<DatasetStatus>)> {
    let database = state.database().await?;

    req_state
        .auth
        .auth_dataset(database, &dataset_id, |_, _, permission| {
            permission.require_mutate()?;
            Ok(())
        })
        .await?;

    let status = status::request_cancel(database, &dataset_id).await?;

    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// Adds a dataset to the draft of a collection.
///
/// Requires ownership of the draft.
#[instrument(skip_all, fields(collection_id))]
pub(crate) async fn create_dataset(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Path(collection_id): Path<String>,
    Json(payload): Json<CreateDatasetRequest>,
) -> ServerResult<(StatusCode, Json<DatasetResponse>)> {
    let database = state.database().await?;

    req_state
        .auth
        .auth_collection(
            database,
            &collection_id,
            Visibility::Private,
            |_, permission| {
                permission.require_mutate()?;
                Ok(())
            },
        )
        .await?;

    if payload.name.trim().is_empty() {
        return Err(ServerError::RequestError(anyhow!(
            "Dataset name must not be empty"
        )));
    }
    check_locations(&payload.artifacts)?;

    let dataset =
        datasets::create_dataset(database, &collection_id, Visibility::Private, payload.into())
            .await
            .map_err(|e| e.into_no_discovery_permissions())?;

    Ok((
        StatusCode::CREATED,
        Json(DatasetResponse {
            dataset_id: dataset.id,
        }),
    ))
}

/// Changes the metadata, artifacts or deployment directories of a dataset.
///
/// Requires permission to mutate the collection of the dataset.
#[instrument(skip_all, fields(dataset_id))]
pub(crate) async fn update_dataset(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Path(dataset_id): Path<String>,
    Json(payload): Json<UpdateDatasetRequest>,
) -> ServerResult<Json<DatasetResponse>> {
    let database = state.database().await?;

    req_state
        .auth
        .auth_dataset(database, &dataset_id, |_, _, permission| {
            permission.require_mutate()?;
            Ok(())
        })
        .await?;

    if let Some(artifacts) = &payload.artifacts {
        check_locations(artifacts)?;
    }

    let dataset = datasets::update_dataset(database, &dataset_id, payload.into()).await?;

    Ok(Json(DatasetResponse {
        dataset_id: dataset.id,
    }))
}

fn check_locations(artifacts: &[ArtifactSpec]) -> ServerResult<()> {
    for artifact in artifacts {
        if artifact.s3_uri.parse::<RemoteFile>().is_err() {
            return Err(ServerError::RequestError(anyhow!(
                "Invalid S3 URI \"{}\" for {}",
                artifact.s3_uri,
                artifact.filename
            )));
        }
    }

    Ok(())
}
