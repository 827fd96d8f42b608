//! The processing status of a dataset.

use sea_orm::entity::prelude::*;

use portal::api::v1::dataset::DatasetStatus;
use portal::status::{ConversionStatus, UploadStatus, ValidationStatus};

pub type ProcessingStatusModel = Model;

/// The processing status of a dataset.
///
/// There is at most one status per dataset.
#[derive(Debug, Clone, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "processing_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique, indexed)]
    pub dataset_id: String,

    pub upload_status: UploadStatus,

    /// Fraction of the upload completed.
    ///
    /// Only meaningful while the upload is in progress.
    pub upload_progress: f64,

    pub upload_message: Option<String>,

    pub validation_status: Option<ValidationStatus>,

    pub validation_message: Option<String>,

    pub conversion_loom_status: Option<ConversionStatus>,

    pub conversion_rds_status: Option<ConversionStatus>,

    pub conversion_cxg_status: Option<ConversionStatus>,

    pub conversion_anndata_status: Option<ConversionStatus>,

    /// Timestamp when the status is created.
    pub created_at: ChronoDateTimeUtc,

    /// Timestamp when the status is last updated.
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dataset::Entity",
        from = "Column::DatasetId",
        to = "super::dataset::Column::Id"
    )]
    Dataset,
}

impl Model {
    /// Returns the status as shown to clients.
    pub fn to_api(&self) -> DatasetStatus {
        DatasetStatus {
            id: self.id.clone(),
            dataset_id: self.dataset_id.clone(),
            upload_status: self.upload_status,
            upload_progress: self.upload_progress,
            upload_message: self.upload_message.clone(),
            validation_status: self.validation_status,
            validation_message: self.validation_message.clone(),
            conversion_loom_status: self.conversion_loom_status,
            conversion_rds_status: self.conversion_rds_status,
            conversion_cxg_status: self.conversion_cxg_status,
            conversion_anndata_status: self.conversion_anndata_status,
        }
    }
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
