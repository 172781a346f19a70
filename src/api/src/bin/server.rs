//! # API Server
//!
//! Serves the manifest-driven service over HTTP.
//!
//! ```bash
//! # Everyone is a local administrator
//! api-server --local --manifest service.json
//!
//! # External identities from x-user-pool / x-username headers
//! RUST_LOG=debug api-server --manifest service.json --port 9090
//! ```

use anyhow::Result;
use clap::Parser;
use seill_api::{create_router, App, AppState, Manifest, ManifestService, ServerConfig};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,seill_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();

    let manifest = match &config.manifest {
        Some(path) => Manifest::load(path)?,
        None => Manifest::default(),
    };
    let store = Arc::new(manifest.identity_store().await);
    let app = App::from_service(
        &ManifestService::new(manifest),
        store,
        config.lookup_policy(),
    )?;

    let bind_addr = config.bind_address();
    info!("Stage: {}, local mode: {}", config.stage, config.local);
    info!("Listening on http://{}", bind_addr);

    let router = create_router(AppState::new(app, config));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
