mod command;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use enum_as_inner::EnumAsInner;

use command::delete_dataset::{self, DeleteDataset};
use command::make_token::{self, MakeToken};
use command::set_upload_status::{self, SetUploadStatus};
use portal_server::config;

/// Data portal administration utilities.
#[derive(Debug, Parser)]
#[clap(version)]
#[clap(propagate_version = true)]
pub struct Opts {
    /// Path to the config file.
    #[clap(short = 'f', long)]
    config: Option<PathBuf>,

    /// The sub-command.
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, EnumAsInner)]
pub enum Command {
    MakeToken(MakeToken),
    SetUploadStatus(SetUploadStatus),
    DeleteDataset(DeleteDataset),
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();
    let config = config::load_config(opts.config.as_deref())?;

    match opts.command {
        Command::MakeToken(_) => make_token::run(config, opts).await?,
        Command::SetUploadStatus(_) => set_upload_status::run(config, opts).await?,
        Command::DeleteDataset(_) => delete_dataset::run(config, opts).await?,
    }

    Ok(())
}
