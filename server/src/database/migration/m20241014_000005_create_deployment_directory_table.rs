use sea_orm_migration::prelude::*;

use crate::database::entity::dataset;
use crate::database::entity::deployment_directory::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20241014_000005_create_deployment_directory_table"
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
                    .col(ColumnDef::new(Column::DatasetId).string_len(36).not_null())
                    .col(ColumnDef::new(Column::Environment).string().not_null())
                    .col(ColumnDef::new(Column::Url).text().not_null())
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_deployment_directory_dataset")
                            .from_tbl(Entity)
                            .from_col(Column::DatasetId)
                            .to_tbl(dataset::Entity)
                            .to_col(dataset::Column::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deployment-directory-dataset")
                    .table(Entity)
                    .col(Column::DatasetId)
                    .to_owned(),
            )
            .await
    }
}
