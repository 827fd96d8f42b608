use super::*;

use sea_orm::PaginatorTrait;

use super::collections::{
    create_collection, list_public_collections, load_collection_detail, publish_collection,
};
use super::datasets::{
    create_dataset, delete_dataset, update_dataset, DatasetUpdate, NewArtifact,
    NewDeploymentDirectory,
};
use crate::status::ProcessingStatusSpec;
use crate::testing::{insert_collection, insert_dataset, test_database, OWNER};
use portal::api::v1::collection::{CollectionLinkSpec, CreateCollectionRequest};
use portal::collection::LinkType;
use portal::dataset::{ArtifactFileType, ArtifactType, OntologyTerm};
use portal::status::UploadStatus;

fn artifact(filename: &str, filetype: ArtifactFileType) -> NewArtifact {
    NewArtifact {
        filename: filename.to_owned(),
        filetype,
        artifact_type: ArtifactType::Remix,
        user_submitted: false,
        s3_uri: format!("s3://bucket/datasets/{}", filename),
    }
}

fn create_request(links: Vec<CollectionLinkSpec>) -> CreateCollectionRequest {
    CreateCollectionRequest {
        name: "Lung atlas".to_owned(),
        description: "Single-cell atlas of the human lung".to_owned(),
        contact_name: Some("Jane Doe".to_owned()),
        contact_email: None,
        data_submission_policy_version: "2.0".to_owned(),
        links,
    }
}

#[tokio::test]
async fn test_update_replaces_children() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Uploading, 0.5).await;
    let original = db.find_artifacts(&dataset.id).await.unwrap();
    assert_eq!(1, original.len());

    let update = DatasetUpdate {
        name: Some("Renamed".to_owned()),
        organism: Some(Some(OntologyTerm {
            label: "Homo sapiens".to_owned(),
            ontology_term_id: "NCBITaxon:9606".to_owned(),
        })),
        artifacts: Some(vec![
            artifact("local.rds", ArtifactFileType::Rds),
            artifact("local.loom", ArtifactFileType::Loom),
        ]),
        deployment_directories: Some(vec![NewDeploymentDirectory {
            environment: "prod".to_owned(),
            url: "https://explorer.example.org/d/local.cxg".to_owned(),
        }]),
        ..Default::default()
    };

    let updated = update_dataset(&db, &dataset.id, update).await.unwrap();
    assert_eq!("Renamed", updated.name);
    assert_eq!("NCBITaxon:9606", updated.organism.0.unwrap().ontology_term_id);

    // Untouched fields keep their values
    assert_eq!(vec!["female".to_owned()], updated.sex.0);

    let artifacts = db.find_artifacts(&dataset.id).await.unwrap();
    let mut filenames: Vec<&str> = artifacts.iter().map(|a| a.filename.as_str()).collect();
    filenames.sort();
    assert_eq!(vec!["local.loom", "local.rds"], filenames);
    assert!(artifacts.iter().all(|a| a.id != original[0].id));

    assert_eq!(1, db.find_deployment_directories(&dataset.id).await.unwrap().len());

    // The processing status was not part of the update
    let status = db.find_processing_status(&dataset.id).await.unwrap().unwrap();
    assert_eq!(UploadStatus::Uploading, status.upload_status);
    assert_eq!(0.5, status.upload_progress);
}

#[tokio::test]
async fn test_update_replaces_status() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Uploading, 0.5).await;
    let old = db.find_processing_status(&dataset.id).await.unwrap().unwrap();

    let update = DatasetUpdate {
        processing_status: Some(ProcessingStatusSpec {
            upload_status: UploadStatus::Failed,
            upload_message: Some("Connection reset".to_owned()),
            ..Default::default()
        }),
        ..Default::default()
    };
    update_dataset(&db, &dataset.id, update).await.unwrap();

    let new = db.find_processing_status(&dataset.id).await.unwrap().unwrap();
    assert_ne!(old.id, new.id);
    assert_eq!(UploadStatus::Failed, new.upload_status);
    assert_eq!(0.0, new.upload_progress);
    assert_eq!(Some("Connection reset".to_owned()), new.upload_message);

    let count = ProcessingStatus::find()
        .filter(processing_status::Column::DatasetId.eq(dataset.id.as_str()))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(1, count);
}

#[tokio::test]
async fn test_missing_collection() {
    let db = test_database().await;

    let result = create_dataset(&db, "c1", Visibility::Private, Default::default()).await;
    assert!(matches!(result, Err(ServerError::NoSuchCollection)));

    let result = update_dataset(&db, "no-such-dataset", Default::default()).await;
    assert!(matches!(result, Err(ServerError::NoSuchDataset)));
}

#[tokio::test]
async fn test_delete_cascades() {
    let db = test_database().await;
    let collection = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let dataset = insert_dataset(&db, &collection, UploadStatus::Waiting, 0.0).await;
    let other = insert_dataset(&db, &collection, UploadStatus::Waiting, 0.0).await;

    delete_dataset(&db, &dataset.id).await.unwrap();

    assert!(matches!(
        db.find_dataset(&dataset.id).await,
        Err(ServerError::NoSuchDataset)
    ));
    assert!(db.find_artifacts(&dataset.id).await.unwrap().is_empty());
    assert!(db.find_processing_status(&dataset.id).await.unwrap().is_none());

    // Siblings are unaffected
    assert_eq!(1, db.find_artifacts(&other.id).await.unwrap().len());
    assert!(db.find_processing_status(&other.id).await.unwrap().is_some());

    assert!(matches!(
        delete_dataset(&db, &dataset.id).await,
        Err(ServerError::NoSuchDataset)
    ));
}

#[tokio::test]
async fn test_create_collection() {
    let db = test_database().await;

    let links = vec![CollectionLinkSpec {
        link_name: Some("Paper".to_owned()),
        link_url: "https://doi.org/10.1000/182".to_owned(),
        link_type: LinkType::Doi,
    }];
    let collection = create_collection(&db, OWNER, create_request(links.clone()))
        .await
        .unwrap();

    assert_eq!(Ok(Visibility::Private), collection.visibility());
    assert_eq!(OWNER, collection.owner);

    let detail = load_collection_detail(&db, collection).await.unwrap();
    assert_eq!(links, detail.links);
    assert!(detail.datasets.is_empty());

    let mut request = create_request(Vec::new());
    request.name = "  ".to_owned();
    assert!(matches!(
        create_collection(&db, OWNER, request).await,
        Err(ServerError::RequestError(_))
    ));
}

#[tokio::test]
async fn test_publish() {
    let db = test_database().await;

    let links = vec![CollectionLinkSpec {
        link_name: None,
        link_url: "https://example.org/raw".to_owned(),
        link_type: LinkType::RawData,
    }];
    let draft = create_collection(&db, OWNER, create_request(links))
        .await
        .unwrap();
    let dataset = insert_dataset(&db, &draft, UploadStatus::Uploaded, 1.0).await;

    assert!(list_public_collections(&db).await.unwrap().is_empty());

    let published = publish_collection(&db, &draft.id).await.unwrap();
    assert_eq!(draft.id, published.id);
    assert_eq!(Ok(Visibility::Public), published.visibility());

    assert!(matches!(
        db.find_collection(&draft.id, Visibility::Private).await,
        Err(ServerError::NoSuchCollection)
    ));

    let detail = load_collection_detail(&db, published).await.unwrap();
    assert_eq!(1, detail.links.len());
    assert_eq!(1, detail.datasets.len());
    assert_eq!(dataset.id, detail.datasets[0].id);
    assert_eq!(
        Some(UploadStatus::Uploaded),
        detail.datasets[0]
            .processing_status
            .as_ref()
            .map(|s| s.upload_status)
    );

    let listed = list_public_collections(&db).await.unwrap();
    assert_eq!(1, listed.len());

    // Nothing left to publish
    assert!(matches!(
        publish_collection(&db, &draft.id).await,
        Err(ServerError::NoSuchCollection)
    ));
}

#[tokio::test]
async fn test_publish_replaces_public_revision() {
    let db = test_database().await;
    let public = insert_collection(&db, "c1", Visibility::Public, OWNER).await;
    let old_dataset = insert_dataset(&db, &public, UploadStatus::Uploaded, 1.0).await;

    let draft = insert_collection(&db, "c1", Visibility::Private, OWNER).await;
    let new_dataset = insert_dataset(&db, &draft, UploadStatus::Uploaded, 1.0).await;

    publish_collection(&db, "c1").await.unwrap();

    assert!(matches!(
        db.find_dataset(&old_dataset.id).await,
        Err(ServerError::NoSuchDataset)
    ));
    assert!(db.find_artifacts(&old_dataset.id).await.unwrap().is_empty());

    let datasets = db
        .find_collection_datasets("c1", Visibility::Public)
        .await
        .unwrap();
    assert_eq!(1, datasets.len());
    assert_eq!(new_dataset.id, datasets[0].id);
    assert_eq!(Visibility::Public.as_str(), datasets[0].collection_visibility);

    let (_, collection) = db.find_dataset_and_collection(&new_dataset.id).await.unwrap();
    assert_eq!(Ok(Visibility::Public), collection.visibility());

    assert_eq!(1, list_public_collections(&db).await.unwrap().len());
}
