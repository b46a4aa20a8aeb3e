mod artifacts;
mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod likes;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::cookie::CookiePolicy;
use crate::auth::token::IdentityVerifier;
use crate::config::{Config, StoreBackend};
use crate::db::{close_pool, create_pool};
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Artifacts API v{}", env!("CARGO_PKG_VERSION"));

    let verifier = IdentityVerifier::new(&config.access_token_secret);
    let cookies = CookiePolicy::new(config.cookie_secure);

    // One store handle for the whole process, injected through AppState
    let (state, pool) = match (config.store_backend, config.database_url.as_deref()) {
        (StoreBackend::Postgres, Some(url)) => {
            let pool = create_pool(url).await?;
            let store = Arc::new(PgStore::new(pool.clone()));
            (AppState::new(store, verifier, cookies), Some(pool))
        }
        (StoreBackend::Postgres, None) => anyhow::bail!("postgres backend needs a database URL"),
        (StoreBackend::Memory, _) => {
            info!("Using in-memory store; data will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            (AppState::new(store, verifier, cookies), None)
        }
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.client_origin)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Server is waiting at: {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }
    info!("Shutdown complete");

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
