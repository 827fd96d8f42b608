#![deny(
    asm_sub_register,
    deprecated,
    missing_abi,
    unsafe_code,
    unused_macros,
    unused_must_use,
    unused_unsafe
)]
#![deny(clippy::from_over_into, clippy::needless_question_mark)]
#![cfg_attr(
    not(debug_assertions),
    deny(unused_imports, unused_mut, unused_variables,)
)]

pub mod access;
mod api;
pub mod config;
pub mod database;
mod error;
mod middleware;
pub mod status;
mod storage;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{extract::Extension, http::Uri, Router};
use sea_orm::{query::Statement, ConnectionTrait, Database, DatabaseConnection};
use tokio::net::TcpListener;
use tokio::sync::OnceCell;
use tokio::time;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use access::http::{apply_auth, AuthState};
use config::Config;
use database::migration::{Migrator, MigratorTrait};
use error::{ServerError, ServerResult};
use middleware::{init_request_state, restrict_host};
use storage::{S3Backend, StorageBackend};

pub use error::ErrorResponse;

type State = Arc<StateInner>;
type RequestState = Arc<RequestStateInner>;

/// Global server state.
#[derive(Debug)]
pub struct StateInner {
    /// The data portal server configuration.
    config: Config,

    /// Handle to the database.
    database: OnceCell<DatabaseConnection>,

    /// Handle to the storage backend.
    storage: OnceCell<Arc<Box<dyn StorageBackend>>>,
}

/// Request state.
#[derive(Debug)]
struct RequestStateInner {
    /// Auth state.
    auth: AuthState,
}

impl StateInner {
    fn new(config: Config) -> State {
        Arc::new(Self {
            config,
            database: OnceCell::new(),
            storage: OnceCell::new(),
        })
    }

    /// Creates a state with already established backends.
    #[cfg(test)]
    fn with_backends(
        config: Config,
        database: DatabaseConnection,
        storage: Box<dyn StorageBackend>,
    ) -> State {
        Arc::new(Self {
            config,
            database: OnceCell::new_with(Some(database)),
            storage: OnceCell::new_with(Some(Arc::new(storage))),
        })
    }

    /// Returns a handle to the database.
    async fn database(&self) -> ServerResult<&DatabaseConnection> {
        self.database
            .get_or_try_init(|| async {
                Database::connect(&self.config.database.url)
                    .await
                    .map_err(ServerError::database_error)
            })
            .await
    }

    /// Returns a handle to the storage backend.
    async fn storage(&self) -> ServerResult<&Arc<Box<dyn StorageBackend>>> {
        self.storage
            .get_or_try_init(|| async {
                let s3 = S3Backend::new(self.config.storage.clone()).await?;
                let boxed: Box<dyn StorageBackend> = Box::new(s3);
                Ok(Arc::new(boxed))
            })
            .await
    }

    /// Sends periodic heartbeat queries to the database.
    async fn run_db_heartbeat(&self) -> ServerResult<()> {
        let db = self.database().await?;
        let stmt =
            Statement::from_string(db.get_database_backend(), "SELECT 'heartbeat';".to_string());

        loop {
            if let Err(e) = db.execute(stmt.clone()).await {
                tracing::warn!("Database heartbeat failed: {}", e);
            }
            time::sleep(Duration::from_secs(60)).await;
        }
    }
}

/// The fallback route.
#[axum_macros::debug_handler]
async fn fallback(_: Uri) -> ServerResult<()> {
    Err(ServerError::NotFound)
}

/// Builds the router with all middlewares.
fn build_router(state: State) -> Router {
    Router::new()
        .merge(api::get_router())
        .fallback(fallback)
        // middlewares
        .layer(axum::middleware::from_fn(apply_auth))
        .layer(axum::middleware::from_fn(init_request_state))
        .layer(axum::middleware::from_fn(restrict_host))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}

/// Runs the API server.
pub async fn run_api_server(cli_listen: Option<SocketAddr>, config: Config) -> Result<()> {
    eprintln!("Starting API server...");

    let state = StateInner::new(config);

    let listen = if let Some(cli_listen) = cli_listen {
        cli_listen
    } else {
        state.config.listen.to_owned()
    };

    let rest = build_router(state.clone());

    eprintln!("Listening on {:?}...", listen);

    let listener = TcpListener::bind(&listen).await?;

    let (server_ret, _) = tokio::join!(axum::serve(listener, rest), async {
        if state.config.database.heartbeat {
            let _ = state.run_db_heartbeat().await;
        }
    });

    server_ret?;

    Ok(())
}

/// Runs database migrations.
pub async fn run_migrations(config: Config) -> Result<()> {
    eprintln!("Running migrations...");

    let state = StateInner::new(config);
    let db = state.database().await?;
    Migrator::up(db, None).await?;

    Ok(())
}

/// Connects to the configured database.
pub async fn connect_database(config: &Config) -> Result<DatabaseConnection> {
    Ok(Database::connect(&config.database.url).await?)
}
