//! Vaporbin - a command line pastebin whose contents evaporate

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaporbin::{create_router, spawn_cleanup_task, AppState, Config, MemcachedStore, MemoryStore};

/// Main entry point for the pastebin server.
///
/// # Startup Sequence
/// 1. Load `.env` and configuration from environment variables
/// 2. Initialize tracing with a filter suited to the environment
/// 3. Pick the paste store (memcached or in-memory with its expiry sweep)
/// 4. Serve the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    _ = dotenvy::dotenv();

    let config = Config::from_env().context("failed to load configuration")?;

    // RUST_LOG overrides the environment's default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.environment.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vaporbin");
    config.log_startup();

    let (state, cleanup_handle) = match config.memcache_server.clone() {
        Some(addr) => {
            let store = MemcachedStore::new(addr, config.paste_ttl);
            info!("Using memcached at {}", store.addr());
            (AppState::new(config.clone(), store), None)
        }
        None => {
            let store = MemoryStore::new(config.cache_quota, config.paste_ttl);
            let handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
            info!("Using in-memory paste store");
            (AppState::new(config.clone(), store), Some(handle))
        }
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the expiry sweep if one runs.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep aborted");
    }
}
