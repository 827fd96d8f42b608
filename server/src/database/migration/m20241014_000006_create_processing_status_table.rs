use sea_orm_migration::prelude::*;

use crate::database::entity::dataset;
use crate::database::entity::processing_status::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20241014_000006_create_processing_status_table"
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
                    .col(ColumnDef::new(Column::UploadStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Column::UploadProgress).double().not_null())
                    .col(ColumnDef::new(Column::UploadMessage).text())
                    .col(ColumnDef::new(Column::ValidationStatus).string_len(16))
                    .col(ColumnDef::new(Column::ValidationMessage).text())
                    .col(ColumnDef::new(Column::ConversionLoomStatus).string_len(16))
                    .col(ColumnDef::new(Column::ConversionRdsStatus).string_len(16))
                    .col(ColumnDef::new(Column::ConversionCxgStatus).string_len(16))
                    .col(ColumnDef::new(Column::ConversionAnndataStatus).string_len(16))
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
                    .foreign_key(
                        ForeignKeyCreateStatement::new()
                            .name("fk_processing_status_dataset")
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
                    .name("idx-processing-status-dataset")
                    .table(Entity)
                    .col(Column::DatasetId)
                    .unique()
                    .to_owned(),
            )
            .await
    }
}
