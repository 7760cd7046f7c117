//! # gate-server
//!
//! Axum server for Gatehouse.
//!
//! Startup runs the root client bootstrap before the listener is bound, so
//! a deployment that cannot grant initial trust never starts serving.
//!
//! ## Usage
//!
//! ```ignore
//! use gate_server::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::{AppState, BootstrapStatus};

use std::sync::Arc;

use axum::Router;
use gate_bootstrap::{BootstrapError, BootstrapInitializer, BootstrapOutcome};
use gate_storage::{BootstrapStore, MemoryStore};
use gate_storage_sql::{PgBootstrapStore, PoolConfig, create_pool, run_migrations};
use sqlx::PgPool;
use tokio::net::TcpListener;

/// The Gatehouse server.
pub struct Server {
    config: ServerConfig,
    store: Arc<dyn BootstrapStore>,
    pool: Option<PgPool>,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// With a `database_url` this connects to `PostgreSQL` and applies the
    /// schema migrations. Without one clients are kept in memory.
    ///
    /// # Errors
    ///
    /// Fails if the database is unreachable or a migration fails.
    pub async fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL is not set, clients are kept in memory");
            return Ok(Self::with_store(config, Arc::new(MemoryStore::new())));
        };

        let pool_config = PoolConfig::new(url)
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .connect_timeout(config.db_connect_timeout);
        let pool = create_pool(&pool_config).await?;
        tracing::info!("Database connection pool created");

        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            config,
            store: Arc::new(PgBootstrapStore::new(pool.clone())),
            pool: Some(pool),
        })
    }

    /// Creates a server over an existing store.
    #[must_use]
    pub fn with_store(config: ServerConfig, store: Arc<dyn BootstrapStore>) -> Self {
        Self {
            config,
            store,
            pool: None,
        }
    }

    /// Runs the root client bootstrap.
    ///
    /// # Errors
    ///
    /// Returns the [`BootstrapError`] of the failing step.
    pub async fn bootstrap(&self) -> Result<BootstrapOutcome, BootstrapError> {
        BootstrapInitializer::new(Arc::clone(&self.store), self.config.bootstrap.clone())
            .run()
            .await
    }

    /// Bootstraps, then serves until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// A bootstrap failure is returned as a [`BootstrapError`] inside the
    /// `anyhow::Error`, before anything is bound.
    pub async fn run(self) -> anyhow::Result<()> {
        let outcome = self.bootstrap().await?;
        let app = self.router(&outcome);

        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        tracing::info!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(pool) = self.pool {
            pool.close().await;
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Builds the router for a finished bootstrap.
    #[must_use]
    pub fn router(&self, outcome: &BootstrapOutcome) -> Router {
        create_router(AppState::new(Arc::clone(&self.store), outcome))
    }

    /// Returns the database pool, if the server uses one.
    #[must_use]
    pub const fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
