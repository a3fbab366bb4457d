//! # Catalog Web Server
//!
//! Process bootstrap: logging, configuration, database, HTTP listener.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CatalogConfig::load  (defaults ← catalog.toml ← environment)        │
//! │  2. tracing subscriber   (RUST_LOG, else config `log` / CATALOG_LOG)    │
//! │  3. Database::new        (pool + migrations)                            │
//! │  4. axum::serve          (until Ctrl-C / SIGTERM)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_web::config::CatalogConfig;
use catalog_web::AppState;

const DEFAULT_LOG_FILTER: &str = "info,catalog_web=debug,catalog_db=debug,sqlx=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded before the subscriber exists: the log filter is part of it.
    let config = CatalogConfig::load(None).context("failed to load configuration")?;
    init_tracing(config.log.as_deref());

    info!("Starting catalog server...");
    info!(
        addr = %config.server.bind_address(),
        db_url = %config.database_url_for_log(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::from_config(&config).await?);
    info!("Database ready");

    catalog_web::serve(&config, state, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `CATALOG_LOG`.
fn init_tracing(catalog_log: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(catalog_log.unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
