//! Collection endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::{LinkType, Visibility};
use crate::dataset::{ArtifactFileType, ArtifactType, OntologyTerm};

use super::dataset::DatasetStatus;

/// A request to create a collection.
///
/// The collection is created as a PRIVATE draft owned by the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,

    pub description: String,

    /// The name of the contact person.
    ///
    /// Defaults to the name in the caller's token.
    #[serde(default)]
    pub contact_name: Option<String>,

    /// The email of the contact person.
    ///
    /// Defaults to the email in the caller's token.
    #[serde(default)]
    pub contact_email: Option<String>,

    /// The version of the data submission policy the caller agreed to.
    pub data_submission_policy_version: String,

    #[serde(default)]
    pub links: Vec<CollectionLinkSpec>,
}

/// A link to be attached to a collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLinkSpec {
    #[serde(default)]
    pub link_name: Option<String>,

    pub link_url: String,

    pub link_type: LinkType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCollectionResponse {
    pub collection_uuid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishCollectionResponse {
    pub collection_uuid: String,

    /// Always PUBLIC.
    pub visibility: Visibility,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCollectionsResponse {
    pub collections: Vec<CollectionSummary>,
}

/// A published collection in the listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Query parameters of the collection endpoint.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CollectionQuery {
    /// The revision to fetch. Defaults to PUBLIC.
    #[serde(default)]
    pub visibility: Visibility,
}

/// A collection revision with its links and datasets.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionDetail {
    pub id: String,
    pub visibility: Visibility,
    pub owner: String,
    pub name: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contact_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contact_email: Option<String>,

    pub data_submission_policy_version: String,

    pub links: Vec<CollectionLinkSpec>,

    pub datasets: Vec<DatasetDetail>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A dataset as listed in a collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetDetail {
    pub id: String,
    pub revision: i32,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub organism: Option<OntologyTerm>,

    pub tissue: Vec<OntologyTerm>,
    pub assay: Vec<OntologyTerm>,
    pub disease: Vec<OntologyTerm>,
    pub sex: Vec<String>,
    pub ethnicity: Vec<OntologyTerm>,
    pub development_stage: Vec<OntologyTerm>,

    pub artifacts: Vec<ArtifactDetail>,

    pub deployment_directories: Vec<DeploymentDirectoryDetail>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub processing_status: Option<DatasetStatus>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactDetail {
    pub id: String,
    pub filename: String,
    pub filetype: ArtifactFileType,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    pub user_submitted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentDirectoryDetail {
    pub id: String,
    pub environment: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateCollectionRequest = serde_json::from_str(
            r#"{
                "name": "Lung atlas",
                "description": "Single-cell lung atlas",
                "data_submission_policy_version": "0.0.1",
                "links": [
                    {"link_url": "https://doi.org/10.1/abc", "link_type": "DOI"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(None, request.contact_name);
        assert_eq!(1, request.links.len());
        assert_eq!(LinkType::Doi, request.links[0].link_type);
        assert_eq!(None, request.links[0].link_name);
    }

    #[test]
    fn test_query_default_visibility() {
        let query: CollectionQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(Visibility::Public, query.visibility);
    }
}
