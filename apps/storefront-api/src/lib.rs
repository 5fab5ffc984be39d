//! # Storefront API
//!
//! HTTP server for the shared cart and checkout.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API Server                            │
//! │                                                                         │
//! │  React client ───► axum (5000) ───► CartService ──────┐                │
//! │                        │                               ├──► CartStore   │
//! │                        └──────────► CheckoutService ───┘   (memory |   │
//! │                                                              SQLite)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is built once in [`build_state`] and shared by both services.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use storefront_core::{CartService, CartStore, CheckoutService, MemoryCartStore, ProductCatalog};
use storefront_db::{Database, DbConfig, DbResult};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, StoreBackend};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub cart: CartService,
    pub checkout: CheckoutService,
    /// Set when the SQLite backend is in use, so shutdown can close it.
    pub database: Option<Database>,
}

/// Builds the catalog, the configured cart store and both services.
pub async fn build_state(config: &AppConfig) -> DbResult<Arc<AppState>> {
    let catalog = Arc::new(ProductCatalog::seeded());

    let (store, database) = match config.store {
        StoreBackend::Memory => {
            let store: Arc<dyn CartStore> = Arc::new(MemoryCartStore::new(catalog.clone()));
            (store, None)
        }
        StoreBackend::Sqlite => {
            let db = Database::new(DbConfig::new(&config.db_path)).await?;
            let store: Arc<dyn CartStore> = Arc::new(db.cart_store(catalog.clone()));
            (store, Some(db))
        }
    };

    info!(
        store = %config.store,
        products = catalog.all().len(),
        tax_rate_bps = config.tax_rate.bps(),
        quantity_update = %config.quantity_update,
        "Application state ready"
    );

    Ok(Arc::new(AppState {
        cart: CartService::new(store.clone(), catalog).with_policy(config.quantity_update),
        checkout: CheckoutService::new(store, config.tax_rate),
        database,
    }))
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/products", get(routes::products::list))
        .route("/api/cart", get(routes::cart::get).post(routes::cart::add))
        .route(
            "/api/cart/{id}",
            put(routes::cart::update).delete(routes::cart::remove),
        )
        .route("/api/checkout", post(routes::checkout::submit))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
