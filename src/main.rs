//! Redis Ledger - HTTP front end for the instrumented caching facade
//!
//! Serves the facade, call replay and page cache over a Redis server or
//! the built-in in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_ledger::api::create_router;
use redis_ledger::{spawn_cleanup_task, AppState, Config, MemoryStore, RedisStore, SharedStore};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis, or create the in-memory store and its TTL sweeper
/// 4. Optionally flush the store
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_ledger=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Redis Ledger");

    let config = Config::from_env();
    info!(
        "Configuration loaded: redis={}, page_cache_ttl={}s, port={}, cleanup_interval={}s",
        config.redis_url.as_deref().unwrap_or("<in-memory>"),
        config.page_cache_ttl,
        config.server_port,
        config.cleanup_interval
    );

    let (store, cleanup_handle): (SharedStore, Option<JoinHandle<()>>) = match &config.redis_url {
        Some(url) => {
            let redis = RedisStore::connect(url)
                .await
                .with_context(|| format!("connecting to {url}"))?;
            (Arc::new(redis), None)
        }
        None => {
            let memory = MemoryStore::new();
            let handle = spawn_cleanup_task(memory.keyspace(), config.cleanup_interval);
            info!("In-memory store initialized with background cleanup");
            (Arc::new(memory), Some(handle))
        }
    };

    if config.flush_on_start {
        store.flush().await.context("flushing store")?;
        warn!("Store flushed on start-up");
    }

    let state = AppState::from_config(&config, store).context("building application state")?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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
        warn!("Cleanup task aborted");
    }
}
