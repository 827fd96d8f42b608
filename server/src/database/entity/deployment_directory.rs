//! A deployment of a dataset to an explorer environment.

use sea_orm::entity::prelude::*;

use portal::api::v1::collection::DeploymentDirectoryDetail;

pub type DeploymentDirectoryModel = Model;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deployment_directory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub dataset_id: String,

    /// Name of the environment, like `prod`.
    pub environment: String,

    pub url: String,
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
    pub fn to_detail(&self) -> DeploymentDirectoryDetail {
        DeploymentDirectoryDetail {
            id: self.id.clone(),
            environment: self.environment.clone(),
            url: self.url.clone(),
        }
    }
}

impl Related<super::dataset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dataset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
