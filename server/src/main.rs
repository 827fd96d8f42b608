use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use portal_server::config;

/// Data portal backend server.
#[derive(Debug, Parser)]
#[clap(version)]
#[clap(propagate_version = true)]
struct Opts {
    /// Path to the config file.
    #[clap(short = 'f', long)]
    config: Option<PathBuf>,

    /// Socket address to listen on.
    ///
    /// This overrides `listen` in the config.
    #[clap(short = 'l', long)]
    listen: Option<SocketAddr>,

    /// Mode to run.
    #[clap(long, default_value = "monolithic")]
    mode: ServerMode,

    /// Format of the log output.
    #[clap(long, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ServerMode {
    /// Run the database migrations, then the API server.
    Monolithic,

    /// Run the API server.
    ApiServer,

    /// Run the database migrations then exit.
    DbMigrations,

    /// Check the configuration then exit.
    CheckConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines.
    Text,

    /// One JSON object per line.
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Opts::parse();

    init_logging(opts.log_format);
    dump_version();

    let config = config::load_config(opts.config.as_deref())?;

    match opts.mode {
        ServerMode::Monolithic => {
            portal_server::run_migrations(config.clone()).await?;
            portal_server::run_api_server(opts.listen, config).await?;
        }
        ServerMode::ApiServer => {
            portal_server::run_api_server(opts.listen, config).await?;
        }
        ServerMode::DbMigrations => {
            portal_server::run_migrations(config).await?;
        }
        ServerMode::CheckConfig => {
            eprintln!("Configuration is valid");
        }
    }

    Ok(())
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .with(ErrorLayer::default())
        .init();
}

fn dump_version() {
    #[cfg(debug_assertions)]
    eprintln!("Portal Server {} (debug)", env!("CARGO_PKG_VERSION"));

    #[cfg(not(debug_assertions))]
    eprintln!("Portal Server {} (release)", env!("CARGO_PKG_VERSION"));
}
