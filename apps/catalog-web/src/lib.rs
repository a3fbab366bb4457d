//! # catalog-web: HTTP Server for the Catalog
//!
//! JSON endpoints and the server-rendered Create form over the catalog
//! record store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Web Server                               │
//! │                                                                         │
//! │  HTTP request                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer ─► CatchPanicLayer ─► router                               │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                        antiforgery::require_token (POST only)          │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                        handlers::product::* ─► CatalogService          │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                            catalog-db (SQLite)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `/health` and `/swagger` are merged after the anti-forgery layer, so it
//! never sees them.
//!
//! ## Modules
//!
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`error`] - `ApiError` and the 500 JSON body
//! - [`antiforgery`] - Session-bound tokens for POST routes
//! - [`service`] - The six catalog operations
//! - [`views`] - maud templates
//! - [`handlers`] - axum handlers
//! - [`swagger`] - OpenAPI document and Swagger UI

pub mod antiforgery;
pub mod config;
pub mod error;
pub mod handlers;
pub mod service;
pub mod swagger;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::antiforgery::Antiforgery;
use crate::config::CatalogConfig;
use crate::handlers::{health, product};
use crate::service::CatalogService;
use catalog_db::{Database, DbConfig};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub antiforgery: Antiforgery,
    /// Serve `/swagger` alongside the catalog routes.
    pub swagger: bool,
}

impl AppState {
    pub fn new(db: Database, antiforgery: Antiforgery) -> Self {
        AppState {
            db,
            antiforgery,
            swagger: true,
        }
    }

    pub fn with_swagger(mut self, enabled: bool) -> Self {
        self.swagger = enabled;
        self
    }

    /// Catalog service for the current request, logging under its span.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.db.products(), tracing::Span::current())
    }

    /// Connects the database and keys the anti-forgery service from config.
    pub async fn from_config(config: &CatalogConfig) -> anyhow::Result<Self> {
        let settings = &config.database;
        let db_config = DbConfig::new(settings.url.clone())
            .max_connections(settings.max_connections)
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .run_migrations(settings.run_migrations);
        let db = Database::new(db_config)
            .await
            .context("failed to open the catalog database")?;

        let antiforgery = match &config.antiforgery.secret {
            Some(secret) => Antiforgery::new(secret)?,
            None => {
                warn!("No anti-forgery secret configured; generated a random one");
                Antiforgery::random()?
            }
        };

        Ok(AppState::new(db, antiforgery).with_swagger(config.server.swagger))
    }
}

/// The catalog routes, without middleware.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/Product", get(product::index))
        .route("/Product/Index", get(product::index))
        .route("/Product/Create", get(product::new_form).post(product::create))
        .route("/Product/Search", get(product::search))
        .route("/Product/Details", get(product::details_by_query))
        .route("/Product/Details/{id}", get(product::details))
        .route("/Product/Delete", post(product::delete_by_query))
        .route("/Product/Delete/{id}", post(product::delete))
}

/// Wraps routes with anti-forgery, panic capture, and request tracing.
pub fn with_middleware(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let mut router = routes
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            antiforgery::require_token,
        ))
        .merge(health::router());

    if state.swagger {
        router = router.merge(swagger::router());
    }

    router
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The complete application router.
pub fn app(state: Arc<AppState>) -> Router {
    with_middleware(routes(), state)
}

/// Binds the listener and serves until `shutdown` resolves.
pub async fn serve(
    config: &CatalogConfig,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", bind_addr))?;

    info!(addr = %bind_addr, "Catalog server listening");

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    state.db.close().await;
    Ok(())
}
