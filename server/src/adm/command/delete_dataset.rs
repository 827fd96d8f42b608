use anyhow::{anyhow, Result};
use clap::Parser;

use crate::Opts;
use portal_server::config::Config;
use portal_server::connect_database;
use portal_server::database::datasets;

/// Delete a dataset together with its artifacts, deployment directories
/// and processing status.
///
/// The files in the bucket are left alone.
#[derive(Debug, Parser)]
pub struct DeleteDataset {
    /// ID of the dataset.
    #[clap(long)]
    dataset: String,
}

pub async fn run(config: Config, opts: Opts) -> Result<()> {
    let sub = opts
        .command
        .as_delete_dataset()
        .ok_or_else(|| anyhow!("Not a delete-dataset command"))?;

    let database = connect_database(&config).await?;
    datasets::delete_dataset(&database, &sub.dataset).await?;

    eprintln!("Deleted dataset {}", sub.dataset);

    Ok(())
}
