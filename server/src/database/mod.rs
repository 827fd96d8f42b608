pub mod collections;
pub mod datasets;
pub mod entity;
pub mod migration;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

use crate::error::{ServerError, ServerResult};
use entity::artifact::{self, ArtifactModel, Entity as Artifact};
use entity::collection::{CollectionModel, Entity as Collection};
use entity::collection_link::{self, CollectionLinkModel, Entity as CollectionLink};
use entity::dataset::{self, DatasetModel, Entity as Dataset};
use entity::deployment_directory::{
    self, DeploymentDirectoryModel, Entity as DeploymentDirectory,
};
use entity::processing_status::{self, Entity as ProcessingStatus, ProcessingStatusModel};
use portal::collection::Visibility;

/// Lookups shared by the API handlers.
///
/// Implemented for both plain connections and transactions.
#[async_trait]
pub trait PortalDatabase: Send + Sync {
    /// Retrieves a dataset.
    async fn find_dataset(&self, dataset_id: &str) -> ServerResult<DatasetModel>;

    /// Retrieves a dataset together with the collection revision it belongs to.
    async fn find_dataset_and_collection(
        &self,
        dataset_id: &str,
    ) -> ServerResult<(DatasetModel, CollectionModel)>;

    /// Retrieves an artifact of a dataset.
    async fn find_artifact(&self, dataset_id: &str, artifact_id: &str)
        -> ServerResult<ArtifactModel>;

    /// Retrieves a collection revision.
    async fn find_collection(
        &self,
        collection_id: &str,
        visibility: Visibility,
    ) -> ServerResult<CollectionModel>;

    /// Retrieves the processing status of a dataset.
    async fn find_processing_status(
        &self,
        dataset_id: &str,
    ) -> ServerResult<Option<ProcessingStatusModel>>;

    /// Retrieves the links of a collection revision.
    async fn find_collection_links(
        &self,
        collection_id: &str,
        visibility: Visibility,
    ) -> ServerResult<Vec<CollectionLinkModel>>;

    /// Retrieves the datasets of a collection revision, oldest first.
    async fn find_collection_datasets(
        &self,
        collection_id: &str,
        visibility: Visibility,
    ) -> ServerResult<Vec<DatasetModel>>;

    /// Retrieves the artifacts of a dataset.
    async fn find_artifacts(&self, dataset_id: &str) -> ServerResult<Vec<ArtifactModel>>;

    /// Retrieves the deployment directories of a dataset.
    async fn find_deployment_directories(
        &self,
        dataset_id: &str,
    ) -> ServerResult<Vec<DeploymentDirectoryModel>>;
}

#[async_trait]
impl<C> PortalDatabase for C
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_dataset(&self, dataset_id: &str) -> ServerResult<DatasetModel> {
        Dataset::find_by_id(dataset_id.to_owned())
            .one(self)
            .await
            .map_err(ServerError::database_error)?
            .ok_or(ServerError::NoSuchDataset)
    }

    async fn find_dataset_and_collection(
        &self,
        dataset_id: &str,
    ) -> ServerResult<(DatasetModel, CollectionModel)> {
        let (dataset, collection) = Dataset::find_by_id(dataset_id.to_owned())
            .find_also_related(Collection)
            .one(self)
            .await
            .map_err(ServerError::database_error)?
            .ok_or(ServerError::NoSuchDataset)?;

        // The foreign key guarantees the collection exists
        let collection = collection.ok_or_else(|| {
            ServerError::DatabaseError(anyhow::anyhow!(
                "Dataset {} has no collection",
                dataset.id
            ))
        })?;

        Ok((dataset, collection))
    }

    async fn find_artifact(
        &self,
        dataset_id: &str,
        artifact_id: &str,
    ) -> ServerResult<ArtifactModel> {
        Artifact::find_by_id(artifact_id.to_owned())
            .filter(artifact::Column::DatasetId.eq(dataset_id))
            .one(self)
            .await
            .map_err(ServerError::database_error)?
            .ok_or(ServerError::NoSuchAsset)
    }

    async fn find_collection(
        &self,
        collection_id: &str,
        visibility: Visibility,
    ) -> ServerResult<CollectionModel> {
        Collection::find_by_id((collection_id.to_owned(), visibility.as_str().to_owned()))
            .one(self)
            .await
            .map_err(ServerError::database_error)?
            .ok_or(ServerError::NoSuchCollection)
    }

    async fn find_processing_status(
        &self,
        dataset_id: &str,
    ) -> ServerResult<Option<ProcessingStatusModel>> {
        ProcessingStatus::find()
            .filter(processing_status::Column::DatasetId.eq(dataset_id))
            .one(self)
            .await
            .map_err(ServerError::database_error)
    }

    async fn find_collection_links(
        &self,
        collection_id: &str,
        visibility: Visibility,
    ) -> ServerResult<Vec<CollectionLinkModel>> {
        CollectionLink::find()
            .filter(collection_link::Column::CollectionId.eq(collection_id))
            .filter(collection_link::Column::CollectionVisibility.eq(visibility.as_str()))
            .order_by_asc(collection_link::Column::Id)
            .all(self)
            .await
            .map_err(ServerError::database_error)
    }

    async fn find_collection_datasets(
        &self,
        collection_id: &str,
        visibility: Visibility,
    ) -> ServerResult<Vec<DatasetModel>> {
        Dataset::find()
            .filter(dataset::Column::CollectionId.eq(collection_id))
            .filter(dataset::Column::CollectionVisibility.eq(visibility.as_str()))
            .order_by_asc(dataset::Column::CreatedAt)
            .all(self)
            .await
            .map_err(ServerError::database_error)
    }

    async fn find_artifacts(&self, dataset_id: &str) -> ServerResult<Vec<ArtifactModel>> {
        Artifact::find()
            .filter(artifact::Column::DatasetId.eq(dataset_id))
            .order_by_asc(artifact::Column::Id)
            .all(self)
            .await
            .map_err(ServerError::database_error)
    }

    async fn find_deployment_directories(
        &self,
        dataset_id: &str,
    ) -> ServerResult<Vec<DeploymentDirectoryModel>> {
        DeploymentDirectory::find()
            .filter(deployment_directory::Column::DatasetId.eq(dataset_id))
            .order_by_asc(deployment_directory::Column::Id)
            .all(self)
            .await
            .map_err(ServerError::database_error)
    }
}

/// Returns the visibility of a collection revision, as stored.
pub(crate) fn stored_visibility(collection: &CollectionModel) -> ServerResult<Visibility> {
    collection.visibility().map_err(|e| {
        ServerError::DatabaseError(anyhow::anyhow!(
            "Collection {} has an invalid visibility: {}",
            collection.id,
            e
        ))
    })
}
