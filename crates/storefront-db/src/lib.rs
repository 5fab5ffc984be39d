//! # storefront-db: Database Layer for the Storefront
//!
//! SQLite persistence for the shared cart, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/cart)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartService (storefront-core) ── Arc<dyn CartStore>                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │ SqliteCartStore │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │   (store.rs)    │    │  (embedded)  │ │   │
//! │  │   └───────────────┘    └─────────────────┘    └──────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (file with WAL, or :memory:)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("./storefront.db")).await?;
//! let store = Arc::new(db.cart_store(catalog.clone()));
//! let cart = CartService::new(store, catalog);
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::SqliteCartStore;
