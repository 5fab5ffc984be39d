//! # Cart Service
//!
//! Add-with-merge, quantity edits, removal and the cart summary.
//!
//! ## Quantity Update Policy
//! ```text
//! update_quantity(id, n)
//!        │
//!        ├── n < 1 ──────────────────────► remove_line(id)      → Removed
//!        │
//!        ├── InPlace  (default) ─────────► set_line(id, n)      → Updated { id }
//!        │
//!        └── Reinsert (legacy) ──────────► replace_line(id, n)   → Updated { new id }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::store::CartStore;
use crate::types::{CartSummary, Product, UpsertedLine};
use crate::validation::{validate_quantity, validate_required};

// =============================================================================
// Policy
// =============================================================================

/// How a positive quantity edit is applied to an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityUpdatePolicy {
    /// Overwrite the quantity; the cart item id is kept.
    #[default]
    InPlace,
    /// Delete the line and add the product again with the new quantity.
    /// The line gets a fresh cart item id.
    Reinsert,
}

#[derive(Debug, Error)]
#[error("unknown quantity update policy '{0}' (expected in_place or reinsert)")]
pub struct UnknownPolicy(pub String);

impl FromStr for QuantityUpdatePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_place" | "inplace" => Ok(QuantityUpdatePolicy::InPlace),
            "reinsert" => Ok(QuantityUpdatePolicy::Reinsert),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for QuantityUpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityUpdatePolicy::InPlace => write!(f, "in_place"),
            QuantityUpdatePolicy::Reinsert => write!(f, "reinsert"),
        }
    }
}

/// Outcome of [`CartService::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line still exists under this id.
    Updated { cart_item_id: String },
    /// The quantity was below 1 and the line was deleted.
    Removed,
}

// =============================================================================
// Cart Service
// =============================================================================

/// Cart operations over a shared store.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
    catalog: Arc<ProductCatalog>,
    policy: QuantityUpdatePolicy,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, catalog: Arc<ProductCatalog>) -> Self {
        CartService {
            store,
            catalog,
            policy: QuantityUpdatePolicy::default(),
        }
    }

    /// Sets the quantity update policy.
    pub fn with_policy(mut self, policy: QuantityUpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// All catalog products.
    pub fn products(&self) -> &[Product] {
        self.catalog.all()
    }

    /// Adds a product, merging into its existing line if there is one.
    ///
    /// ## Errors
    /// - InvalidRequest: blank `product_id`
    /// - NotFound: product is not in the catalog
    /// - InvalidRequest: `quantity < 1`, or the merged quantity overflows
    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> CoreResult<UpsertedLine> {
        validate_required("productId", product_id)?;
        if !self.catalog.contains(product_id) {
            return Err(CoreError::not_found("Product", product_id));
        }
        validate_quantity(quantity)?;

        let line = self.store.upsert_line(product_id, quantity).await?;
        debug!(
            product_id,
            quantity,
            cart_item_id = %line.cart_item_id,
            merged = line.merged,
            "Added to cart"
        );
        Ok(line)
    }

    /// Changes the quantity of a line; below 1 removes it.
    pub async fn update_quantity(&self, cart_item_id: &str, quantity: i64) -> CoreResult<QuantityUpdate> {
        if quantity < 1 {
            self.remove_from_cart(cart_item_id).await?;
            return Ok(QuantityUpdate::Removed);
        }

        match self.policy {
            QuantityUpdatePolicy::InPlace => {
                self.store.set_line(cart_item_id, quantity).await?;
                debug!(cart_item_id, quantity, "Updated cart line in place");
                Ok(QuantityUpdate::Updated {
                    cart_item_id: cart_item_id.to_string(),
                })
            }
            QuantityUpdatePolicy::Reinsert => {
                let line = self.store.replace_line(cart_item_id, quantity).await?;
                debug!(
                    old_cart_item_id = cart_item_id,
                    cart_item_id = %line.cart_item_id,
                    quantity,
                    "Reinserted cart line"
                );
                Ok(QuantityUpdate::Updated {
                    cart_item_id: line.cart_item_id,
                })
            }
        }
    }

    /// Deletes a line.
    pub async fn remove_from_cart(&self, cart_item_id: &str) -> CoreResult<()> {
        let removed = self.store.remove_line(cart_item_id).await?;
        debug!(cart_item_id, product_id = %removed.product_id, "Removed from cart");
        Ok(())
    }

    /// Current cart with its total and item count.
    pub async fn get_cart_summary(&self) -> CoreResult<CartSummary> {
        let items = self.store.list_lines().await?;

        let mut raw_total = Money::zero();
        let mut item_count: i64 = 0;
        for item in &items {
            raw_total = item
                .line_total()
                .and_then(|line| raw_total.checked_add(line))
                .ok_or_else(|| ValidationError::Overflow {
                    field: "total".to_string(),
                })?;
            item_count = item_count
                .checked_add(item.quantity)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "itemCount".to_string(),
                })?;
        }

        Ok(CartSummary {
            items,
            total: raw_total.round_cents(),
            item_count,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
