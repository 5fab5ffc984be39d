//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │    CartItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  product_id     │   │  line + product │       │
//! │  │  name           │   │  cart_item_id   │──►│  name, price    │       │
//! │  │  price          │   │  quantity ≥ 1   │   │  (display row)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  CartSummary    │   │    Receipt      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  items          │   │  order_id       │       │
//! │  │  800 = 8%       │   │  total          │   │  total, tax     │       │
//! │  └─────────────────┘   │  item_count     │   │  grand_total    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire names are camelCase, the shape the React client reads and posts
//! back at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (the checkout surcharge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact fraction (800 bps → 0.08).
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable opaque identifier.
    pub id: String,

    /// Display name shown in the cart and on the receipt.
    pub name: String,

    /// Unit price, never negative.
    pub price: Money,

    /// Image path served by the frontend.
    pub image: String,

    /// Short description for the product card.
    pub description: String,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product-and-quantity entry held in the shared cart.
///
/// ## Invariants
/// - `quantity >= 1`
/// - At most one line per `product_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Opaque id assigned when the line is created.
    pub cart_item_id: String,
    pub product_id: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

/// Result of merging an add into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertedLine {
    /// Id of the line that now holds the product.
    pub cart_item_id: String,
    /// `true` when an existing line was incremented, `false` when created.
    pub merged: bool,
}

// =============================================================================
// Cart Item (snapshot row)
// =============================================================================

/// A cart line joined with its product fields for display.
///
/// This is also the shape the client submits to checkout. Prices here are
/// whatever the caller sent; checkout does not re-resolve them. Only `price`
/// and `quantity` are required on input, and fields this type does not know
/// are kept in `extra` so the receipt echoes the submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cart_item_id: String,

    /// Product reference, sent as `id`. Also accepted as `productId`.
    #[serde(rename = "id", alias = "productId", default, skip_serializing_if = "String::is_empty")]
    pub product_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub price: Money,

    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,

    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl CartItem {
    /// Joins a line with the product it references.
    pub fn from_line(line: &CartLine, product: &Product) -> Self {
        CartItem {
            cart_item_id: line.cart_item_id.clone(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: line.quantity,
            image: Some(product.image.clone()),
            description: Some(product.description.clone()),
            extra: Map::new(),
        }
    }

    /// Line total (price × quantity), `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// What `GET /api/cart` returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    /// Σ price × quantity, rounded to cents.
    pub total: Money,
    /// Σ quantity across lines, not the number of lines.
    pub item_count: i64,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// Customer details captured at checkout. Free text, only checked for
/// presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Immutable record of a completed checkout. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Unique per checkout (UUID v4).
    pub order_id: String,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    pub customer_info: CustomerInfo,

    /// The submitted cart snapshot, verbatim.
    pub items: Vec<CartItem>,

    pub total: Money,

    pub tax: Money,

    /// Raw total × (1 + rate), rounded once. Not `total + tax`.
    pub grand_total: Money,

    /// Cart lines cleared by this checkout that the submission did not
    /// include.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
