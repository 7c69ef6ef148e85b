use std::sync::Arc;

use anyhow::Context;
use backend::{build_router, AppState, Config, MemoryTaskStore, RedisTaskStore, StoreTarget, TaskStore};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    let store: Arc<dyn TaskStore> = match &config.store {
        StoreTarget::Memory => {
            warn!("using in-memory store; tasks will not survive a restart");
            Arc::new(MemoryTaskStore::new())
        }
        StoreTarget::Redis(url) => match RedisTaskStore::connect(url).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                error!(store = %config.store, error = %err, "failed to connect to store");
                return Err(err).context("connecting to Redis");
            }
        },
    };
    info!(store = %config.store, "App connected to database");

    let app = build_router(AppState::new(store), config.static_dir.as_deref());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "App is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
