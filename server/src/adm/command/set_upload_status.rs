use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};

use crate::Opts;
use portal::status::UploadStatus;
use portal_server::config::Config;
use portal_server::{connect_database, status};

/// Move the upload of a dataset to a new state.
///
/// This does what the ingestion worker does when it reports progress.
/// For example, to finalize a cancellation:
///
/// $ portaladm set-upload-status --dataset 3d8d6c5e-... cancelled
#[derive(Debug, Parser)]
pub struct SetUploadStatus {
    /// ID of the dataset.
    #[clap(long)]
    dataset: String,

    /// The new state of the upload.
    state: UploadState,

    /// Fraction of the upload completed, between 0 and 1.
    ///
    /// Only used when moving to `uploading`.
    #[clap(long)]
    progress: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UploadState {
    Uploading,
    Uploaded,
    CancelPending,
    Cancelled,
    Failed,
}

impl From<UploadState> for UploadStatus {
    fn from(state: UploadState) -> Self {
        match state {
            UploadState::Uploading => Self::Uploading,
            UploadState::Uploaded => Self::Uploaded,
            UploadState::CancelPending => Self::CancelPending,
            UploadState::Cancelled => Self::Cancelled,
            UploadState::Failed => Self::Failed,
        }
    }
}

pub async fn run(config: Config, opts: Opts) -> Result<()> {
    let sub = opts
        .command
        .as_set_upload_status()
        .ok_or_else(|| anyhow!("Not a set-upload-status command"))?;

    let database = connect_database(&config).await?;
    let status = status::advance(&database, &sub.dataset, sub.state.into(), sub.progress).await?;

    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
