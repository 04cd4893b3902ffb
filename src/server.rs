//! HTTP server initialization and runtime setup.
//!
//! Handles store setup, migrations, and the Axum server lifecycle.

use crate::application::services::AuthService;
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::{LinkRepository, UserRepository};
use crate::infrastructure::persistence::{MemoryStore, PgLinkRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The configured store backend (PostgreSQL pool + migrations, or the
///   in-memory store)
/// - Application services and shared state
/// - Axum HTTP server with graceful shutdown on ctrl-c / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (link_repository, user_repository) = init_store(&config).await?;

    let auth_service = Arc::new(AuthService::new(&config.jwt_secret));
    let state = AppState::new(
        link_repository,
        user_repository,
        auth_service,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Builds the repository pair for the configured backend.
///
/// Both trait objects point at the same underlying store, so cascade
/// semantics (user delete removing links and clicks) hold across them.
async fn init_store(
    config: &Config,
) -> Result<(Arc<dyn LinkRepository>, Arc<dyn UserRepository>)> {
    match config.store {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("database configuration missing for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");

            let pool = Arc::new(pool);
            Ok((
                Arc::new(PgLinkRepository::new(pool.clone())) as Arc<dyn LinkRepository>,
                Arc::new(PgUserRepository::new(pool)) as Arc<dyn UserRepository>,
            ))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; all data is lost on shutdown");
            let store = Arc::new(MemoryStore::new());
            Ok((
                store.clone() as Arc<dyn LinkRepository>,
                store as Arc<dyn UserRepository>,
            ))
        }
    }
}

/// Resolves when the process receives ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
