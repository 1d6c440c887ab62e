//! Quran Proxy - a caching proxy for the Quran Foundation content API
//!
//! Caches upstream content in per-category TTL caches and exposes the HTTP
//! surface the memorization front end consumes.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod proxy;
mod tasks;
mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::CacheStore;
use config::Config;
use tasks::spawn_sweep_task;
use upstream::{TokenManager, UpstreamClient};

/// Main entry point for the proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Wire token manager, upstream client, cache store, and orchestrator
/// 4. Start the background expiry sweep task
/// 5. Create the Axum router with all endpoints
/// 6. Start the HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quran_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quran content proxy");

    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;
    info!(
        "Configuration loaded: port={}, environment={:?}, sweep_interval={}s",
        config.server_port, config.api_environment, config.sweep_interval
    );

    // Shared HTTP client for token and content traffic
    let http = UpstreamClient::build_http_client().context("Failed to build HTTP client")?;

    let tokens = Arc::new(TokenManager::new(
        http.clone(),
        config.api_environment.token_url(),
        config.client_id.clone(),
        config.client_secret.clone(),
        Duration::from_secs(config.token_margin_secs),
    ));

    let upstream = Arc::new(UpstreamClient::new(
        http,
        config.api_environment.api_base_url(),
        config.client_id.clone(),
        tokens,
    ));

    let cache = Arc::new(RwLock::new(CacheStore::new()));
    info!("Cache store initialized");

    // Start background sweep task
    let sweep_handle = spawn_sweep_task(cache.clone(), config.sweep_interval);
    info!("Background sweep task started");

    let state = AppState::from_parts(cache, upstream, &config);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    sweep_handle.abort();
    warn!("Sweep task aborted");
}
