use sea_orm_migration::prelude::*;

use crate::database::entity::collection;
use crate::database::entity::collection_link::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20241014_000002_create_collection_link_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Column::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Column::CollectionId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(Column::CollectionVisibility)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Column::LinkName).string())
                    .col(ColumnDef::new(Column::LinkUrl).text().not_null())
                    .col(ColumnDef::new(Column::LinkType).string_len(16).not_null())
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_collection_link_collection")
                            .from_tbl(Entity)
                            .from_col(Column::CollectionId)
                            .from_col(Column::CollectionVisibility)
                            .to_tbl(collection::Entity)
                            .to_col(collection::Column::Id)
                            .to_col(collection::Column::Visibility)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-collection-link-collection")
                    .table(Entity)
                    .col(Column::CollectionId)
                    .col(Column::CollectionVisibility)
                    .to_owned(),
            )
            .await
    }
}
