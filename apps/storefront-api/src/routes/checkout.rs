//! Checkout endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use storefront_core::{CartItem, CustomerInfo, Receipt};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub customer_info: CustomerInfo,
}

/// POST /api/checkout: Settle the submitted cart into a receipt.
#[tracing::instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<Receipt>, ApiError> {
    let Json(req) = payload?;
    let receipt = state.checkout.checkout(req.cart_items, req.customer_info).await?;
    Ok(Json(receipt))
}
