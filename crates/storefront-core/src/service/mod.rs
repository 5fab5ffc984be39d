//! # Services
//!
//! Business rules layered over a [`CartStore`](crate::store::CartStore).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler ──► CartService ──────┐                                  │
//! │                   (add/update/      │                                   │
//! │                    remove/summary)  ├──► Arc<dyn CartStore>             │
//! │                                     │                                   │
//! │  HTTP handler ──► CheckoutService ──┘                                  │
//! │                   (totals, receipt, drain)                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both services share the same store instance; neither owns global state.

mod cart;
mod checkout;

pub use cart::{CartService, QuantityUpdate, QuantityUpdatePolicy, UnknownPolicy};
pub use checkout::CheckoutService;
