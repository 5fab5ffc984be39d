//! # storefront-core: Cart & Checkout Engine
//!
//! Money, domain types, the cart store seam and the two services the HTTP
//! layer calls.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Product grid ──► Cart panel ──► Checkout form ──► Receipt    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-api (axum)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  catalog  │  │  service  │  │   store   │  │   │
//! │  │   │   Money   │  │  Product  │  │   Cart    │  │ CartStore │  │   │
//! │  │   │  TaxRate  │  │  snapshot │  │  Checkout │  │  Memory   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (SqliteCartStore)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, CartItem, Receipt)
//! - [`money`] - Exact decimal money and tax math
//! - [`error`] - CoreError and ValidationError
//! - [`validation`] - Input rules
//! - [`catalog`] - Read-only product set
//! - [`store`] - `CartStore` trait and the in-memory store
//! - [`service`] - CartService and CheckoutService
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::{CartService, MemoryCartStore, ProductCatalog};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = Arc::new(ProductCatalog::seeded());
//! let store = Arc::new(MemoryCartStore::new(catalog.clone()));
//! let cart = CartService::new(store, catalog);
//!
//! cart.add_to_cart("1", 2).await.unwrap();
//! let summary = cart.get_cart_summary().await.unwrap();
//! assert_eq!(summary.item_count, 2);
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::ProductCatalog;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use service::{CartService, CheckoutService, QuantityUpdate, QuantityUpdatePolicy};
pub use store::{CartStore, MemoryCartStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Checkout tax rate in basis points (8%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;
