//! A dataset.

use sea_orm::entity::prelude::*;

use super::Json;
use portal::dataset::OntologyTerm;

pub type DatasetModel = Model;

/// A dataset.
///
/// A dataset belongs to exactly one collection revision.
#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dataset")]
pub struct Model {
    /// ID of the dataset, a UUID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub revision: i32,

    pub name: String,

    /// ID of the owning collection.
    #[sea_orm(indexed)]
    pub collection_id: String,

    /// Visibility of the owning collection revision.
    pub collection_visibility: String,

    pub organism: Json<Option<OntologyTerm>>,

    pub tissue: Json<Vec<OntologyTerm>>,

    pub assay: Json<Vec<OntologyTerm>>,

    pub disease: Json<Vec<OntologyTerm>>,

    pub sex: Json<Vec<String>>,

    pub ethnicity: Json<Vec<OntologyTerm>>,

    pub development_stage: Json<Vec<OntologyTerm>>,

    /// Timestamp when the dataset is created.
    pub created_at: ChronoDateTimeUtc,

    /// Timestamp when the dataset is last updated.
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "(Column::CollectionId, Column::CollectionVisibility)",
        to = "(super::collection::Column::Id, super::collection::Column::Visibility)"
    )]
    Collection,

    #[sea_orm(has_many = "super::artifact::Entity")]
    Artifact,

    #[sea_orm(has_many = "super::deployment_directory::Entity")]
    DeploymentDirectory,

    #[sea_orm(has_one = "super::processing_status::Entity")]
    ProcessingStatus,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::artifact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artifact.def()
    }
}

impl Related<super::deployment_directory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeploymentDirectory.def()
    }
}

impl Related<super::processing_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessingStatus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
