//! Dataset records.
//!
//! A dataset and its children (artifacts, deployment directories and the
//! processing status) are always written together in one transaction.
//! Updating a child collection replaces it entirely, children are never
//! merged.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use super::entity::artifact::{self, Entity as Artifact};
use super::entity::dataset::{self, DatasetModel, Entity as Dataset};
use super::entity::deployment_directory::{self, Entity as DeploymentDirectory};
use super::entity::processing_status::{self, Entity as ProcessingStatus};
use super::entity::Json;
use super::PortalDatabase;
use crate::error::{ServerError, ServerResult};
use crate::status::{self, ProcessingStatusSpec};
use portal::api::v1::dataset::{
    ArtifactSpec, CreateDatasetRequest, DeploymentDirectorySpec, UpdateDatasetRequest,
};
use portal::collection::Visibility;
use portal::dataset::{ArtifactFileType, ArtifactType, OntologyTerm};

/// A new dataset.
#[derive(Debug, Clone, Default)]
pub struct NewDataset {
    pub name: String,
    pub revision: i32,
    pub organism: Option<OntologyTerm>,
    pub tissue: Vec<OntologyTerm>,
    pub assay: Vec<OntologyTerm>,
    pub disease: Vec<OntologyTerm>,
    pub sex: Vec<String>,
    pub ethnicity: Vec<OntologyTerm>,
    pub development_stage: Vec<OntologyTerm>,
    pub artifacts: Vec<NewArtifact>,
    pub deployment_directories: Vec<NewDeploymentDirectory>,

    /// The initial processing status.
    ///
    /// If unset, the dataset starts out waiting for its upload.
    pub processing_status: Option<ProcessingStatusSpec>,
}

/// A new artifact of a dataset.
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub filename: String,
    pub filetype: ArtifactFileType,
    pub artifact_type: ArtifactType,
    pub user_submitted: bool,
    pub s3_uri: String,
}

/// A new deployment directory of a dataset.
#[derive(Debug, Clone)]
pub struct NewDeploymentDirectory {
    pub environment: String,
    pub url: String,
}

/// Changes to a dataset.
///
/// Fields set to `None` are left untouched. Child collections that are
/// set replace all existing children of that kind.
#[derive(Debug, Clone, Default)]
pub struct DatasetUpdate {
    pub name: Option<String>,
    pub revision: Option<i32>,
    pub organism: Option<Option<OntologyTerm>>,
    pub tissue: Option<Vec<OntologyTerm>>,
    pub assay: Option<Vec<OntologyTerm>>,
    pub disease: Option<Vec<OntologyTerm>>,
    pub sex: Option<Vec<String>>,
    pub ethnicity: Option<Vec<OntologyTerm>>,
    pub development_stage: Option<Vec<OntologyTerm>>,
    pub artifacts: Option<Vec<NewArtifact>>,
    pub deployment_directories: Option<Vec<NewDeploymentDirectory>>,
    pub processing_status: Option<ProcessingStatusSpec>,
}

impl From<ArtifactSpec> for NewArtifact {
    fn from(artifact: ArtifactSpec) -> Self {
        Self {
            filename: artifact.filename,
            filetype: artifact.filetype,
            artifact_type: artifact.artifact_type,
            user_submitted: artifact.user_submitted,
            s3_uri: artifact.s3_uri,
        }
    }
}

impl From<DeploymentDirectorySpec> for NewDeploymentDirectory {
    fn from(directory: DeploymentDirectorySpec) -> Self {
        Self {
            environment: directory.environment,
            url: directory.url,
        }
    }
}

impl From<CreateDatasetRequest> for NewDataset {
    fn from(request: CreateDatasetRequest) -> Self {
        Self {
            name: request.name,
            revision: request.revision,
            organism: request.organism,
            tissue: request.tissue,
            assay: request.assay,
            disease: request.disease,
            sex: request.sex,
            ethnicity: request.ethnicity,
            development_stage: request.development_stage,
            artifacts: request.artifacts.into_iter().map(Into::into).collect(),
            deployment_directories: request
                .deployment_directories
                .into_iter()
                .map(Into::into)
                .collect(),
            processing_status: None,
        }
    }
}

impl From<UpdateDatasetRequest> for DatasetUpdate {
    fn from(request: UpdateDatasetRequest) -> Self {
        Self {
            name: request.name,
            revision: request.revision,
            organism: request.organism.map(Some),
            tissue: request.tissue,
            assay: request.assay,
            disease: request.disease,
            sex: request.sex,
            ethnicity: request.ethnicity,
            development_stage: request.development_stage,
            artifacts: request
                .artifacts
                .map(|artifacts| artifacts.into_iter().map(Into::into).collect()),
            deployment_directories: request
                .deployment_directories
                .map(|directories| directories.into_iter().map(Into::into).collect()),
            processing_status: None,
        }
    }
}

/// Creates a dataset in a collection revision.
#[instrument(skip(database, new), fields(name = %new.name))]
pub async fn create_dataset(
    database: &DatabaseConnection,
    collection_id: &str,
    visibility: Visibility,
    new: NewDataset,
) -> ServerResult<DatasetModel> {
    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    txn.find_collection(collection_id, visibility).await?;

    let now = Utc::now();
    let dataset_id = Uuid::new_v4().to_string();

    let model = dataset::ActiveModel {
        id: Set(dataset_id.clone()),
        revision: Set(new.revision),
        name: Set(new.name),
        collection_id: Set(collection_id.to_owned()),
        collection_visibility: Set(visibility.as_str().to_owned()),
        organism: Set(Json(new.organism)),
        tissue: Set(Json(new.tissue)),
        assay: Set(Json(new.assay)),
        disease: Set(Json(new.disease)),
        sex: Set(Json(new.sex)),
        ethnicity: Set(Json(new.ethnicity)),
        development_stage: Set(Json(new.development_stage)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(ServerError::database_error)?;

    insert_artifacts(&txn, &dataset_id, new.artifacts).await?;
    insert_deployment_directories(&txn, &dataset_id, new.deployment_directories).await?;

    match new.processing_status {
        Some(new_status) => status::replace(&txn, &dataset_id, new_status).await?,
        None => status::initialize(&txn, &dataset_id).await?,
    };

    txn.commit().await.map_err(ServerError::database_error)?;

    tracing::info!(dataset_id = %model.id, "Created dataset");

    Ok(model)
}

/// Updates a dataset.
#[instrument(skip(database, update))]
pub async fn update_dataset(
    database: &DatabaseConnection,
    dataset_id: &str,
    update: DatasetUpdate,
) -> ServerResult<DatasetModel> {
    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    let existing = txn.find_dataset(dataset_id).await?;
    let mut model = existing.into_active_model();

    if let Some(name) = update.name {
        model.name = Set(name);
    }
    if let Some(revision) = update.revision {
        model.revision = Set(revision);
    }
    if let Some(organism) = update.organism {
        model.organism = Set(Json(organism));
    }
    if let Some(tissue) = update.tissue {
        model.tissue = Set(Json(tissue));
    }
    if let Some(assay) = update.assay {
        model.assay = Set(Json(assay));
    }
    if let Some(disease) = update.disease {
        model.disease = Set(Json(disease));
    }
    if let Some(sex) = update.sex {
        model.sex = Set(Json(sex));
    }
    if let Some(ethnicity) = update.ethnicity {
        model.ethnicity = Set(Json(ethnicity));
    }
    if let Some(development_stage) = update.development_stage {
        model.development_stage = Set(Json(development_stage));
    }
    model.updated_at = Set(Utc::now());

    let updated = model
        .update(&txn)
        .await
        .map_err(ServerError::database_error)?;

    if let Some(artifacts) = update.artifacts {
        Artifact::delete_many()
            .filter(artifact::Column::DatasetId.eq(dataset_id))
            .exec(&txn)
            .await
            .map_err(ServerError::database_error)?;

        insert_artifacts(&txn, dataset_id, artifacts).await?;
    }

    if let Some(directories) = update.deployment_directories {
        DeploymentDirectory::delete_many()
            .filter(deployment_directory::Column::DatasetId.eq(dataset_id))
            .exec(&txn)
            .await
            .map_err(ServerError::database_error)?;

        insert_deployment_directories(&txn, dataset_id, directories).await?;
    }

    if let Some(new_status) = update.processing_status {
        status::replace(&txn, dataset_id, new_status).await?;
    }

    txn.commit().await.map_err(ServerError::database_error)?;

    Ok(updated)
}

/// Deletes a dataset and everything it owns.
#[instrument(skip(database))]
pub async fn delete_dataset(database: &DatabaseConnection, dataset_id: &str) -> ServerResult<()> {
    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    txn.find_dataset(dataset_id).await?;
    delete_datasets(&txn, &[dataset_id.to_owned()]).await?;

    txn.commit().await.map_err(ServerError::database_error)?;

    Ok(())
}

/// Deletes datasets together with their children.
///
/// Call this within a transaction.
pub(crate) async fn delete_datasets<C: ConnectionTrait>(
    conn: &C,
    dataset_ids: &[String],
) -> ServerResult<()> {
    if dataset_ids.is_empty() {
        return Ok(());
    }

    let ids = dataset_ids.iter().cloned();

    Artifact::delete_many()
        .filter(artifact::Column::DatasetId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(ServerError::database_error)?;

    DeploymentDirectory::delete_many()
        .filter(deployment_directory::Column::DatasetId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(ServerError::database_error)?;

    ProcessingStatus::delete_many()
        .filter(processing_status::Column::DatasetId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(ServerError::database_error)?;

    Dataset::delete_many()
        .filter(dataset::Column::Id.is_in(ids))
        .exec(conn)
        .await
        .map_err(ServerError::database_error)?;

    Ok(())
}

async fn insert_artifacts<C: ConnectionTrait>(
    conn: &C,
    dataset_id: &str,
    artifacts: Vec<NewArtifact>,
) -> ServerResult<()> {
    if artifacts.is_empty() {
        return Ok(());
    }

    let models = artifacts.into_iter().map(|a| artifact::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        dataset_id: Set(dataset_id.to_owned()),
        filename: Set(a.filename),
        filetype: Set(a.filetype),
        artifact_type: Set(a.artifact_type),
        user_submitted: Set(a.user_submitted),
        s3_uri: Set(a.s3_uri),
    });

    Artifact::insert_many(models)
        .exec_without_returning(conn)
        .await
        .map_err(ServerError::database_error)?;

    Ok(())
}

async fn insert_deployment_directories<C: ConnectionTrait>(
    conn: &C,
    dataset_id: &str,
    directories: Vec<NewDeploymentDirectory>,
) -> ServerResult<()> {
    if directories.is_empty() {
        return Ok(());
    }

    let models = directories
        .into_iter()
        .map(|d| deployment_directory::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            dataset_id: Set(dataset_id.to_owned()),
            environment: Set(d.environment),
            url: Set(d.url),
        });

    DeploymentDirectory::insert_many(models)
        .exec_without_returning(conn)
        .await
        .map_err(ServerError::database_error)?;

    Ok(())
}
