mod collection;
mod dataset;


use axum::{
    routing::{delete, get, post},
    Router,
};

pub(crate) fn get_router() -> Router {
    Router::new()
        .route(
            "/dp/v1/collections",
            get(collection::list_collections).post(collection::create_collection),
        )
        .route("/dp/v1/collections/:collection_id", get(collection::get_collection))
        .route(
            "/dp/v1/collections/:collection_id/publish",
            post(collection::publish_collection),
        )
        .route(
            "/dp/v1/collections/:collection_id/datasets",
            post(dataset::create_dataset),
        )
        .route(
            "/dp/v1/datasets/:dataset_id",
            delete(dataset::cancel_upload).patch(dataset::update_dataset),
        )
        .route(
            "/dp/v1/datasets/:dataset_id/status",
            get(dataset::get_dataset_status),
        )
        .route(
            "/dp/v1/datasets/:dataset_id/asset/:asset_id",
            get(dataset::get_dataset_asset).post(dataset::get_dataset_asset),
        )
}
