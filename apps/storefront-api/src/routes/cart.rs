//! Cart endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use storefront_core::{CartSummary, QuantityUpdate};

use crate::error::ApiError;
use crate::routes::MessageResponse;
use crate::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub product_id: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

// -- Handlers --

/// GET /api/cart: Current cart with total and item count.
#[tracing::instrument(skip(state))]
pub async fn get(State(state): State<Arc<AppState>>) -> Result<Json<CartSummary>, ApiError> {
    Ok(Json(state.cart.get_cart_summary().await?))
}

/// POST /api/cart: Add a product, merging with its existing line.
#[tracing::instrument(skip(state, payload))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    let line = state
        .cart
        .add_to_cart(&req.product_id, req.quantity.unwrap_or(1))
        .await?;

    let message = if line.merged {
        "Cart updated successfully"
    } else {
        "Item added to cart"
    };
    Ok(Json(MessageResponse::with_item(message, line.cart_item_id)))
}

/// PUT /api/cart/{id}: Set a line's quantity; below 1 removes it.
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateQuantityRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;

    let response = match state.cart.update_quantity(&id, req.quantity).await? {
        QuantityUpdate::Updated { cart_item_id } => {
            MessageResponse::with_item("Cart item updated", cart_item_id)
        }
        QuantityUpdate::Removed => MessageResponse::new("Item removed from cart"),
    };
    Ok(Json(response))
}

/// DELETE /api/cart/{id}: Remove a line.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.cart.remove_from_cart(&id).await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}
