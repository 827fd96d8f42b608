//! Database migrations.

pub use sea_orm_migration::*;

mod m20241014_000001_create_collection_table;
mod m20241014_000002_create_collection_link_table;
mod m20241014_000003_create_dataset_table;
mod m20241014_000004_create_artifact_table;
mod m20241014_000005_create_deployment_directory_table;
mod m20241014_000006_create_processing_status_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241014_000001_create_collection_table::Migration),
            Box::new(m20241014_000002_create_collection_link_table::Migration),
            Box::new(m20241014_000003_create_dataset_table::Migration),
            Box::new(m20241014_000004_create_artifact_table::Migration),
            Box::new(m20241014_000005_create_deployment_directory_table::Migration),
            Box::new(m20241014_000006_create_processing_status_table::Migration),
        ]
    }
}
