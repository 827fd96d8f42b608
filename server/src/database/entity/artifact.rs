//! A file belonging to a dataset.

use sea_orm::entity::prelude::*;

use portal::api::v1::collection::ArtifactDetail;
use portal::dataset::{ArtifactFileType, ArtifactType};

pub type ArtifactModel = Model;

/// A file belonging to a dataset.
///
/// The file itself lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "artifact")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub dataset_id: String,

    /// The file name presented to clients.
    pub filename: String,

    pub filetype: ArtifactFileType,

    #[sea_orm(column_name = "type")]
    pub artifact_type: ArtifactType,

    /// Whether the file was submitted by the user or derived by conversion.
    pub user_submitted: bool,

    /// Location of the file, in the form `s3://bucket/key`.
    pub s3_uri: String,
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
    pub fn to_detail(&self) -> ArtifactDetail {
        ArtifactDetail {
            id: self.id.clone(),
            filename: self.filename.clone(),
            filetype: self.filetype,
            artifact_type: self.artifact_type,
            user_submitted: self.user_submitted,
        }
    }
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
