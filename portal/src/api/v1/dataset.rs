//! Dataset endpoints.

use serde::{Deserialize, Serialize};

use crate::dataset::{ArtifactFileType, ArtifactType, OntologyTerm};
use crate::status::{ConversionStatus, UploadStatus, ValidationStatus};

/// The processing status of a dataset as returned to clients.
///
/// Bookkeeping fields of the stored row are never part of this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatus {
    /// The ID of the status record.
    pub id: String,

    /// The dataset this status belongs to.
    pub dataset_id: String,

    pub upload_status: UploadStatus,

    /// Fraction of the upload completed, between 0 and 1.
    pub upload_progress: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub upload_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub validation_status: Option<ValidationStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub validation_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub conversion_loom_status: Option<ConversionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub conversion_rds_status: Option<ConversionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub conversion_cxg_status: Option<ConversionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub conversion_anndata_status: Option<ConversionStatus>,
}

/// A time-limited download link for a dataset artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetAssetLink {
    pub dataset_id: String,

    /// The file name of the artifact.
    pub file_name: String,

    /// The size of the object in bytes.
    pub file_size: u64,

    /// A presigned URL that can be fetched without credentials.
    pub presigned_url: String,
}

/// A request to add a dataset to the draft of a collection.
///
/// The dataset starts out waiting for its upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDatasetRequest {
    pub name: String,

    #[serde(default)]
    pub revision: i32,

    #[serde(default)]
    pub organism: Option<OntologyTerm>,

    #[serde(default)]
    pub tissue: Vec<OntologyTerm>,

    #[serde(default)]
    pub assay: Vec<OntologyTerm>,

    #[serde(default)]
    pub disease: Vec<OntologyTerm>,

    #[serde(default)]
    pub sex: Vec<String>,

    #[serde(default)]
    pub ethnicity: Vec<OntologyTerm>,

    #[serde(default)]
    pub development_stage: Vec<OntologyTerm>,

    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,

    #[serde(default)]
    pub deployment_directories: Vec<DeploymentDirectorySpec>,
}

/// A request to change a dataset.
///
/// Absent fields are left untouched. A list of artifacts or deployment
/// directories replaces all existing ones.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateDatasetRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub revision: Option<i32>,

    #[serde(default)]
    pub organism: Option<OntologyTerm>,

    #[serde(default)]
    pub tissue: Option<Vec<OntologyTerm>>,

    #[serde(default)]
    pub assay: Option<Vec<OntologyTerm>>,

    #[serde(default)]
    pub disease: Option<Vec<OntologyTerm>>,

    #[serde(default)]
    pub sex: Option<Vec<String>>,

    #[serde(default)]
    pub ethnicity: Option<Vec<OntologyTerm>>,

    #[serde(default)]
    pub development_stage: Option<Vec<OntologyTerm>>,

    #[serde(default)]
    pub artifacts: Option<Vec<ArtifactSpec>>,

    #[serde(default)]
    pub deployment_directories: Option<Vec<DeploymentDirectorySpec>>,
}

/// A file to be attached to a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub filename: String,

    pub filetype: ArtifactFileType,

    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,

    #[serde(default)]
    pub user_submitted: bool,

    /// Location of the file, in the form of `s3://bucket/key`.
    pub s3_uri: String,
}

/// Where a dataset is deployed for exploration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentDirectorySpec {
    pub environment: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub dataset_id: String,
}
