//! # Cart Store
//!
//! The storage seam under the cart and checkout services.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartService / CheckoutService                                         │
//! │       │                                                                 │
//! │       │  Arc<dyn CartStore>                                            │
//! │       ▼                                                                 │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │  MemoryCartStore     │        │  SqliteCartStore     │              │
//! │  │  (this crate)        │        │  (storefront-db)     │              │
//! │  │  Mutex<Vec<Line>>    │        │  cart_lines table    │              │
//! │  └──────────────────────┘        └──────────────────────┘              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Contract
//! Every method is one atomic step against concurrent callers. In
//! particular `upsert_line` must never let two concurrent adds of the same
//! product both create a line, and `clear` must hand back exactly the lines
//! it removed. No add may land between the delete and the insert of
//! `replace_line`.

mod memory;

pub use memory::MemoryCartStore;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{CartItem, CartLine, UpsertedLine};

/// Mutable collection of cart lines.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Adds `quantity_delta` to the line for `product_id`, creating the line
    /// if there is none.
    ///
    /// `quantity_delta` must be at least 1. Fails with InvalidRequest if the
    /// merged quantity overflows.
    async fn upsert_line(&self, product_id: &str, quantity_delta: i64) -> CoreResult<UpsertedLine>;

    /// Replaces the quantity of an existing line. `quantity` must be at
    /// least 1; callers route smaller values to removal.
    async fn set_line(&self, cart_item_id: &str, quantity: i64) -> CoreResult<()>;

    /// Deletes a line and adds its product back as a new last line holding
    /// exactly `quantity`, under a fresh cart item id.
    ///
    /// `quantity` must be at least 1. NotFound leaves the store unchanged.
    async fn replace_line(&self, cart_item_id: &str, quantity: i64) -> CoreResult<UpsertedLine>;

    /// Deletes a line and returns it. NotFound leaves the store unchanged.
    async fn remove_line(&self, cart_item_id: &str) -> CoreResult<CartLine>;

    /// Fetches one raw line.
    async fn get_line(&self, cart_item_id: &str) -> CoreResult<Option<CartLine>>;

    /// Cart snapshot joined with product data, in insertion order.
    async fn list_lines(&self) -> CoreResult<Vec<CartItem>>;

    /// Empties the cart and returns the lines that were removed.
    async fn clear(&self) -> CoreResult<Vec<CartLine>>;
}
