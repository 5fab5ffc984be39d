//! Product catalog endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use storefront_core::Product;

use crate::AppState;

/// GET /api/products: All catalog products.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.cart.products().to_vec())
}
