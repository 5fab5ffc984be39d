//! # Checkout Service
//!
//! Turns a submitted cart snapshot into a [`Receipt`] and empties the cart.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Draft ──► Checkout requested ──► Cleared (Receipt emitted)            │
//! │                    │                                                    │
//! │                    ├── 1. validate items + customer   (no mutation)     │
//! │                    ├── 2. raw = Σ price × quantity                      │
//! │                    ├── 3. total = round(raw)                            │
//! │                    │      tax   = round(raw × rate)                     │
//! │                    │      grand = round(raw × (1 + rate))               │
//! │                    ├── 4. orderId, timestamp                            │
//! │                    └── 5. store.clear()  ── Err ──► Internal, no receipt│
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices come from the submission, not the catalog. The clear returns the
//! lines it removed; any line the submission did not cover is reported in
//! [`Receipt::warnings`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::store::CartStore;
use crate::types::{CartItem, CartLine, CustomerInfo, Receipt, TaxRate};
use crate::validation::{validate_checkout_items, validate_customer_info};

/// Checkout over a shared store.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn CartStore>,
    tax_rate: TaxRate,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn CartStore>, tax_rate: TaxRate) -> Self {
        CheckoutService { store, tax_rate }
    }

    /// Completes a checkout.
    ///
    /// ## Errors
    /// - InvalidRequest: empty item list, bad item, missing customer field,
    ///   or totals out of range. The cart is untouched.
    /// - Internal: the cart could not be cleared. No receipt is produced.
    pub async fn checkout(&self, items: Vec<CartItem>, customer: CustomerInfo) -> CoreResult<Receipt> {
        validate_checkout_items(&items)?;
        validate_customer_info(&customer)?;

        let raw_total = raw_total(&items)?;
        let overflow = || ValidationError::Overflow {
            field: "total".to_string(),
        };
        let total = raw_total.round_cents();
        let tax = raw_total.calculate_tax(self.tax_rate).ok_or_else(overflow)?;
        let grand_total = raw_total.with_tax(self.tax_rate).ok_or_else(overflow)?;

        let order_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now();

        let drained = self.store.clear().await.map_err(|err| {
            error!(order_id = %order_id, error = %err, "Failed to clear cart at checkout");
            CoreError::internal(format!("checkout could not clear the cart: {}", err))
        })?;

        let warnings = uncovered_lines(&items, &drained);
        for warning in &warnings {
            warn!(order_id = %order_id, "{}", warning);
        }

        info!(
            order_id = %order_id,
            items = items.len(),
            total = %total,
            tax = %tax,
            grand_total = %grand_total,
            cleared_lines = drained.len(),
            "Checkout completed"
        );

        Ok(Receipt {
            order_id,
            timestamp,
            customer_info: customer,
            items,
            total,
            tax,
            grand_total,
            warnings,
        })
    }
}

/// Σ price × quantity, unrounded.
fn raw_total(items: &[CartItem]) -> CoreResult<Money> {
    items.iter().enumerate().try_fold(Money::zero(), |sum, (index, item)| {
        item.line_total()
            .and_then(|line| sum.checked_add(line))
            .ok_or_else(|| {
                CoreError::from(ValidationError::Overflow {
                    field: format!("cartItems[{}]", index),
                })
            })
    })
}

/// Describes drained lines the submission did not account for.
///
/// A line is covered when the submission carries its cart item id with the
/// same quantity.
fn uncovered_lines(items: &[CartItem], drained: &[CartLine]) -> Vec<String> {
    let submitted: HashMap<&str, i64> = items
        .iter()
        .map(|item| (item.cart_item_id.as_str(), item.quantity))
        .collect();

    drained
        .iter()
        .filter_map(|line| match submitted.get(line.cart_item_id.as_str()) {
            None => Some(format!(
                "Cart item {} (product {}, quantity {}) was cleared but not included in this order",
                line.cart_item_id, line.product_id, line.quantity
            )),
            Some(&ordered) if ordered != line.quantity => Some(format!(
                "Cart item {} (product {}) held quantity {} but {} was ordered",
                line.cart_item_id, line.product_id, line.quantity, ordered
            )),
            Some(_) => None,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
