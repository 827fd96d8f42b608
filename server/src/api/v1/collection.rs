//! Collection endpoints.

use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use tracing::instrument;

use crate::database::collections;
use crate::error::{ServerError, ServerResult};
use crate::{RequestState, State};
use portal::api::v1::collection::{
    CollectionDetail, CollectionQuery, CollectionSummary, CreateCollectionRequest,
    CreateCollectionResponse, ListCollectionsResponse, PublishCollectionResponse,
};
use portal::collection::Visibility;

/// Lists all published collections.
#[instrument(skip_all)]
pub(crate) async fn list_collections(
    Extension(state): Extension<State>,
) -> ServerResult<Json<ListCollectionsResponse>> {
    let database = state.database().await?;

    let collections = collections::list_public_collections(database)
        .await?
        .into_iter()
        .map(|c| CollectionSummary {
            id: c.id,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(ListCollectionsResponse { collections }))
}

/// Creates a collection owned by the caller.
///
/// Requires an authenticated caller. The contact defaults to the profile
/// in the caller's token.
#[instrument(skip_all)]
pub(crate) async fn create_collection(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Json(mut payload): Json<CreateCollectionRequest>,
) -> ServerResult<(StatusCode, Json<CreateCollectionResponse>)> {
    let token = req_state
        .auth
        .token
        .get()
        .ok_or(ServerError::Unauthorized)?;
    let owner = token.sub().ok_or(ServerError::Unauthorized)?;

    if payload.contact_name.is_none() {
        payload.contact_name = token.name().map(str::to_owned);
    }
    if payload.contact_email.is_none() {
        payload.contact_email = token.email().map(str::to_owned);
    }

    let database = state.database().await?;
    let collection = collections::create_collection(database, owner, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCollectionResponse {
            collection_uuid: collection.id,
        }),
    ))
}

/// Returns a collection revision with its links and datasets.
///
/// Published revisions are visible to everyone, drafts only to their
/// owners.
#[instrument(skip_all, fields(collection_id, visibility))]
pub(crate) async fn get_collection(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Path(collection_id): Path<String>,
    Query(query): Query<CollectionQuery>,
) -> ServerResult<Json<CollectionDetail>> {
    let database = state.database().await?;

    let collection = req_state
        .auth
        .auth_collection(
            database,
            &collection_id,
            query.visibility,
            |collection, permission| {
                permission.require_view()?;
                Ok(collection)
            },
        )
        .await?;

    let detail = collections::load_collection_detail(database, collection).await?;

    Ok(Json(detail))
}

/// Publishes the draft of a collection.
///
/// Requires ownership of the draft.
#[instrument(skip_all, fields(collection_id))]
pub(crate) async fn publish_collection(
    Extension(state): Extension<State>,
    Extension(req_state): Extension<RequestState>,
    Path(collection_id): Path<String>,
) -> ServerResult<(StatusCode, Json<PublishCollectionResponse>)> {
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

    let published = collections::publish_collection(database, &collection_id)
        .await
        .map_err(|e| e.into_no_discovery_permissions())?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PublishCollectionResponse {
            collection_uuid: published.id,
            visibility: Visibility::Public,
        }),
    ))
}
