//! HTTP route handlers.

pub mod cart;
pub mod checkout;
pub mod health;
pub mod products;

use serde::Serialize;

/// `{ "message": ..., "cartItemId": ... }` returned by cart mutations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_item_id: Option<String>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        MessageResponse {
            message,
            cart_item_id: None,
        }
    }

    pub fn with_item(message: &'static str, cart_item_id: String) -> Self {
        MessageResponse {
            message,
            cart_item_id: Some(cart_item_id),
        }
    }
}
