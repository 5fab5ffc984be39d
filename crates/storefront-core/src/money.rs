//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Why not integer cents?                                                 │
//! │    Checkout prices come from the client and may carry more than two     │
//! │    decimal places (1.0049). Rounding them on entry would change the     │
//! │    receipt totals.                                                      │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    Exact sums and products, rounding to cents only where a total        │
//! │    is reported.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(line, Money::from_cents(3297));
//! ```
//!
//! Arithmetic is checked: `Decimal` panics on overflow, and quantities and
//! prices at checkout are caller-supplied.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::types::TaxRate;

/// Decimal places of the currency (USD cents).
pub const CURRENCY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in currency major units (dollars), held exactly.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► CartItem.price ──► line (price × quantity)
///                                          │
///                        Σ lines ──► raw total ──┬──► total      (round 2dp)
///                                                ├──► tax        (raw × rate)
///                                                └──► grandTotal (raw × (1 + rate))
/// ```
///
/// Serialized as a JSON number (`99.99`), which is what the client sends
/// and expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1999);
    /// assert_eq!(price.to_string(), "$19.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_DECIMALS))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to whole cents, half away from zero.
    ///
    /// ## Rounding Rule
    /// ```text
    /// 1.005  → 1.01
    /// 1.0049 → 1.00
    /// -0.125 → -0.13
    /// ```
    /// This is what `toFixed(2)` produces for amounts that are exact in
    /// binary, and it is applied only when a total is reported.
    pub fn round_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.checked_mul_quantity(3).unwrap();
    /// assert_eq!(line_total, Money::from_cents(897)); // $8.97
    /// ```
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Applies a rate without rounding: `self × rate`.
    pub fn checked_apply_rate(&self, rate: TaxRate) -> Option<Money> {
        self.0.checked_mul(rate.as_decimal()).map(Money)
    }

    /// Tax on this amount, rounded to cents.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// let total = Money::from_cents(1999); // $19.99
    /// let tax = total.calculate_tax(TaxRate::from_bps(800)).unwrap();
    /// // 19.99 × 0.08 = 1.5992 → 1.60
    /// assert_eq!(tax, Money::from_cents(160));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        self.checked_apply_rate(rate).map(|tax| tax.round_cents())
    }

    /// This amount scaled by `1 + rate`, rounded to cents.
    ///
    /// ## Note
    /// Computed from the unrounded amount in one step, so it can differ by
    /// a cent from `round(self) + calculate_tax(self)`.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// let raw = Money::from_decimal(Decimal::new(10049, 4)); // 1.0049
    /// let rate = TaxRate::from_bps(800);
    /// assert_eq!(raw.with_tax(rate).unwrap(), Money::from_cents(109));
    /// assert_eq!(raw.round_cents(), Money::from_cents(100));
    /// assert_eq!(raw.calculate_tax(rate).unwrap(), Money::from_cents(8));
    /// ```
    pub fn with_tax(&self, rate: TaxRate) -> Option<Money> {
        let factor = Decimal::ONE.checked_add(rate.as_decimal())?;
        self.0
            .checked_mul(factor)
            .map(|gross| Money(gross).round_cents())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$10.99`, for logs and messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let rounded = self.round_cents().0.abs();
        write!(f, "{}${:.2}", sign, rounded)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        rust_decimal::serde::float::deserialize(deserializer).map(Money)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
