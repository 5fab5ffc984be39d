//! # Validation Module
//!
//! Input validation for cart and checkout requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler                                                 │
//! │  └── JSON shape (deserialization, missing body fields)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services                                                     │
//! │  └── THIS MODULE: quantities, checkout items, customer presence       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  ├── quantity >= 1 (CHECK constraint in SQLite)                        │
//! │  └── UNIQUE product_id                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_quantity, validate_required};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_required("productId", " ").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CartItem, CustomerInfo};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates that a text field is present and not blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be at least 1
///
/// There is deliberately no upper bound: repeated adds must sum exactly.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates the cart snapshot submitted to checkout.
///
/// ## Rules
/// - At least one item
/// - Every item: quantity ≥ 1, price ≥ 0
pub fn validate_checkout_items(items: &[CartItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "cartItems".to_string(),
        });
    }

    for (index, item) in items.iter().enumerate() {
        if item.quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: format!("cartItems[{}].quantity", index),
            });
        }
        if item.price.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: format!("cartItems[{}].price", index),
            });
        }
    }

    Ok(())
}

/// Validates that customer name and email are present.
///
/// The email is not checked for format.
pub fn validate_customer_info(customer: &CustomerInfo) -> ValidationResult<()> {
    validate_required("customerInfo.name", &customer.name)?;
    validate_required("customerInfo.email", &customer.email)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
