//! Collection records.

use anyhow::anyhow;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use super::datasets::delete_datasets;
use super::entity::collection::{self, CollectionModel, Entity as Collection};
use super::entity::collection_link::{self, Entity as CollectionLink};
use super::entity::dataset::{self, Entity as Dataset};
use super::{stored_visibility, PortalDatabase};
use crate::error::{ServerError, ServerResult};
use portal::api::v1::collection::{
    CollectionDetail, CollectionLinkSpec, CreateCollectionRequest, DatasetDetail,
};
use portal::collection::Visibility;

/// Creates a PRIVATE collection owned by `owner`.
#[instrument(skip(database, request), fields(name = %request.name))]
pub async fn create_collection(
    database: &DatabaseConnection,
    owner: &str,
    request: CreateCollectionRequest,
) -> ServerResult<CollectionModel> {
    if request.name.trim().is_empty() {
        return Err(ServerError::RequestError(anyhow!(
            "Collection name must not be empty"
        )));
    }

    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    let now = Utc::now();
    let collection_id = Uuid::new_v4().to_string();

    let model = collection::ActiveModel {
        id: Set(collection_id.clone()),
        visibility: Set(Visibility::Private.as_str().to_owned()),
        owner: Set(owner.to_owned()),
        name: Set(request.name),
        description: Set(request.description),
        contact_name: Set(request.contact_name),
        contact_email: Set(request.contact_email),
        data_submission_policy_version: Set(request.data_submission_policy_version),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(ServerError::database_error)?;

    insert_links(&txn, &collection_id, Visibility::Private, request.links).await?;

    txn.commit().await.map_err(ServerError::database_error)?;

    tracing::info!(collection_id = %model.id, "Created collection");

    Ok(model)
}

/// Returns all PUBLIC collections, oldest first.
pub async fn list_public_collections<C: ConnectionTrait>(
    conn: &C,
) -> ServerResult<Vec<CollectionModel>> {
    Collection::find()
        .filter(collection::Column::Visibility.eq(Visibility::Public.as_str()))
        .order_by_asc(collection::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(ServerError::database_error)
}

/// Loads a collection revision with its links and datasets.
pub async fn load_collection_detail<C: PortalDatabase>(
    conn: &C,
    collection: CollectionModel,
) -> ServerResult<CollectionDetail> {
    let visibility = stored_visibility(&collection)?;

    let links = conn
        .find_collection_links(&collection.id, visibility)
        .await?
        .iter()
        .map(|link| link.to_spec())
        .collect();

    let mut datasets = Vec::new();
    for dataset in conn
        .find_collection_datasets(&collection.id, visibility)
        .await?
    {
        let artifacts = conn.find_artifacts(&dataset.id).await?;
        let directories = conn.find_deployment_directories(&dataset.id).await?;
        let status = conn.find_processing_status(&dataset.id).await?;

        datasets.push(DatasetDetail {
            id: dataset.id,
            revision: dataset.revision,
            name: dataset.name,
            organism: dataset.organism.0,
            tissue: dataset.tissue.0,
            assay: dataset.assay.0,
            disease: dataset.disease.0,
            sex: dataset.sex.0,
            ethnicity: dataset.ethnicity.0,
            development_stage: dataset.development_stage.0,
            artifacts: artifacts.iter().map(|a| a.to_detail()).collect(),
            deployment_directories: directories.iter().map(|d| d.to_detail()).collect(),
            processing_status: status.map(|s| s.to_api()),
            created_at: dataset.created_at,
            updated_at: dataset.updated_at,
        });
    }

    Ok(CollectionDetail {
        id: collection.id,
        visibility,
        owner: collection.owner,
        name: collection.name,
        description: collection.description,
        contact_name: collection.contact_name,
        contact_email: collection.contact_email,
        data_submission_policy_version: collection.data_submission_policy_version,
        links,
        datasets,
        created_at: collection.created_at,
        updated_at: collection.updated_at,
    })
}

/// Publishes the PRIVATE revision of a collection.
///
/// The contents of the draft replace the PUBLIC revision, whose datasets
/// and links are deleted. The draft itself is removed afterwards.
#[instrument(skip(database))]
pub async fn publish_collection(
    database: &DatabaseConnection,
    collection_id: &str,
) -> ServerResult<CollectionModel> {
    let txn = database
        .begin()
        .await
        .map_err(ServerError::database_error)?;

    let draft = txn
        .find_collection(collection_id, Visibility::Private)
        .await?;

    let now = Utc::now();

    let published = match txn.find_collection(collection_id, Visibility::Public).await {
        Ok(previous) => {
            let old_datasets: Vec<String> = txn
                .find_collection_datasets(collection_id, Visibility::Public)
                .await?
                .into_iter()
                .map(|d| d.id)
                .collect();
            delete_datasets(&txn, &old_datasets).await?;
            delete_links(&txn, collection_id, Visibility::Public).await?;

            let mut update = previous.into_active_model();
            update.owner = Set(draft.owner.clone());
            update.name = Set(draft.name.clone());
            update.description = Set(draft.description.clone());
            update.contact_name = Set(draft.contact_name.clone());
            update.contact_email = Set(draft.contact_email.clone());
            update.data_submission_policy_version =
                Set(draft.data_submission_policy_version.clone());
            update.updated_at = Set(now);

            update
                .update(&txn)
                .await
                .map_err(ServerError::database_error)?
        }
        Err(ServerError::NoSuchCollection) => collection::ActiveModel {
            id: Set(draft.id.clone()),
            visibility: Set(Visibility::Public.as_str().to_owned()),
            owner: Set(draft.owner.clone()),
            name: Set(draft.name.clone()),
            description: Set(draft.description.clone()),
            contact_name: Set(draft.contact_name.clone()),
            contact_email: Set(draft.contact_email.clone()),
            data_submission_policy_version: Set(draft.data_submission_policy_version.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServerError::database_error)?,
        Err(e) => return Err(e),
    };

    Dataset::update_many()
        .col_expr(
            dataset::Column::CollectionVisibility,
            Expr::value(Visibility::Public.as_str()),
        )
        .col_expr(dataset::Column::UpdatedAt, Expr::value(now))
        .filter(dataset::Column::CollectionId.eq(collection_id))
        .filter(dataset::Column::CollectionVisibility.eq(Visibility::Private.as_str()))
        .exec(&txn)
        .await
        .map_err(ServerError::database_error)?;

    CollectionLink::update_many()
        .col_expr(
            collection_link::Column::CollectionVisibility,
            Expr::value(Visibility::Public.as_str()),
        )
        .filter(collection_link::Column::CollectionId.eq(collection_id))
        .filter(collection_link::Column::CollectionVisibility.eq(Visibility::Private.as_str()))
        .exec(&txn)
        .await
        .map_err(ServerError::database_error)?;

    Collection::delete_by_id((collection_id.to_owned(), Visibility::Private.as_str().to_owned()))
        .exec(&txn)
        .await
        .map_err(ServerError::database_error)?;

    txn.commit().await.map_err(ServerError::database_error)?;

    tracing::info!("Published collection");

    Ok(published)
}

async fn insert_links<C: ConnectionTrait>(
    conn: &C,
    collection_id: &str,
    visibility: Visibility,
    links: Vec<CollectionLinkSpec>,
) -> ServerResult<()> {
    if links.is_empty() {
        return Ok(());
    }

    let models = links.into_iter().map(|link| collection_link::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        collection_id: Set(collection_id.to_owned()),
        collection_visibility: Set(visibility.as_str().to_owned()),
        link_name: Set(link.link_name),
        link_url: Set(link.link_url),
        link_type: Set(link.link_type),
    });

    CollectionLink::insert_many(models)
        .exec_without_returning(conn)
        .await
        .map_err(ServerError::database_error)?;

    Ok(())
}

async fn delete_links<C: ConnectionTrait>(
    conn: &C,
    collection_id: &str,
    visibility: Visibility,
) -> ServerResult<()> {
    CollectionLink::delete_many()
        .filter(collection_link::Column::CollectionId.eq(collection_id))
        .filter(collection_link::Column::CollectionVisibility.eq(visibility.as_str()))
        .exec(conn)
        .await
        .map_err(ServerError::database_error)?;

    Ok(())
}
