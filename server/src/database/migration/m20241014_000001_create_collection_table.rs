use sea_orm_migration::prelude::*;

use crate::database::entity::collection::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20241014_000001_create_collection_table"
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
                    .col(ColumnDef::new(Column::Id).string_len(36).not_null())
                    .col(ColumnDef::new(Column::Visibility).string_len(16).not_null())
                    .col(ColumnDef::new(Column::Owner).string().not_null())
                    .col(ColumnDef::new(Column::Name).string().not_null())
                    .col(ColumnDef::new(Column::Description).text().not_null())
                    .col(ColumnDef::new(Column::ContactName).string())
                    .col(ColumnDef::new(Column::ContactEmail).string())
                    .col(
                        ColumnDef::new(Column::DataSubmissionPolicyVersion)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Column::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Column::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(Index::create().col(Column::Id).col(Column::Visibility))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-collection-owner")
                    .table(Entity)
                    .col(Column::Owner)
                    .to_owned(),
            )
            .await
    }
}
