//! A collection revision.

use sea_orm::entity::prelude::*;

use portal::collection::Visibility;
use portal::error::PortalResult;

pub type CollectionModel = Model;

/// A revision of a collection.
///
/// The PUBLIC and PRIVATE revisions of a collection share the same ID.
#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "collection")]
pub struct Model {
    /// ID of the collection, a UUID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Visibility of this revision.
    ///
    /// Either `PUBLIC` or `PRIVATE`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub visibility: String,

    /// The user ID of the owner.
    #[sea_orm(indexed)]
    pub owner: String,

    pub name: String,

    pub description: String,

    pub contact_name: Option<String>,

    pub contact_email: Option<String>,

    /// The version of the data submission policy the owner agreed to.
    pub data_submission_policy_version: String,

    /// Timestamp when the revision is created.
    pub created_at: ChronoDateTimeUtc,

    /// Timestamp when the revision is last updated.
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dataset::Entity")]
    Dataset,

    #[sea_orm(has_many = "super::collection_link::Entity")]
    CollectionLink,
}

impl Model {
    pub fn visibility(&self) -> PortalResult<Visibility> {
        self.visibility.parse()
    }
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl Related<super::collection_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
