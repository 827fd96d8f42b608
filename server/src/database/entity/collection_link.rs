//! An external link of a collection.

use sea_orm::entity::prelude::*;

use portal::api::v1::collection::CollectionLinkSpec;
use portal::collection::LinkType;

pub type CollectionLinkModel = Model;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "collection_link")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub collection_id: String,

    pub collection_visibility: String,

    pub link_name: Option<String>,

    pub link_url: String,

    pub link_type: LinkType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "(Column::CollectionId, Column::CollectionVisibility)",
        to = "(super::collection::Column::Id, super::collection::Column::Visibility)"
    )]
    Collection,
}

impl Model {
    pub fn to_spec(&self) -> CollectionLinkSpec {
        CollectionLinkSpec {
            link_name: self.link_name.clone(),
            link_url: self.link_url.clone(),
            link_type: self.link_type,
        }
    }
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
