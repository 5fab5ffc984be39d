//! Integration tests for the API server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use storefront_api::config::{AppConfig, StoreBackend};
use storefront_core::QuantityUpdatePolicy;
use tower::ServiceExt;

async fn setup_with(config: AppConfig) -> Router {
    let state = storefront_api::build_state(&config).await.unwrap();
    storefront_api::create_app(state)
}

async fn setup() -> Router {
    setup_with(AppConfig::default()).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn customer() -> Value {
    json!({ "name": "Ada Lovelace", "email": "ada@example.com" })
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json.get("database").is_none());
}

#[tokio::test]
async fn test_health_reports_database() {
    let config = AppConfig {
        store: StoreBackend::Sqlite,
        ..AppConfig::default()
    };
    let state = storefront_api::build_state(&config).await.unwrap();
    let app = storefront_api::create_app(state.clone());

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["database"], "ok");

    state.database.as_ref().unwrap().close().await;

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "degraded");
}

#[tokio::test]
async fn test_list_products() {
    let app = setup().await;
    let (status, json) = send(&app, "GET", "/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    let products = json.as_array().unwrap();
    assert_eq!(products.len(), 5);
    assert_eq!(products[0]["name"], "Wireless Headphones");
    assert_eq!(products[0]["price"], 99.99);
    assert_eq!(products[2]["image"], "/images/laptop.jpg");
}

#[tokio::test]
async fn test_add_merges_and_reports_message() {
    let app = setup().await;

    let (status, first) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "1", "quantity": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "Item added to cart");

    let (_, second) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "1" }))).await;
    assert_eq!(second["message"], "Cart updated successfully");
    assert_eq!(second["cartItemId"], first["cartItemId"]);

    let (status, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["itemCount"], 3);
    assert_eq!(cart["total"], 299.97);
}

#[tokio::test]
async fn test_cart_items_expose_product_as_id() {
    let app = setup().await;
    send(&app, "POST", "/api/cart", Some(json!({ "productId": "4", "quantity": 1 }))).await;

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    let item = cart["items"][0].clone();
    assert_eq!(item["id"], "4");
    assert!(item.get("productId").is_none());

    // Client-side quantity edit: delete the line, then add it back by `id`.
    let uri = format!("/api/cart/{}", item["cartItemId"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, json) = send(&app, "POST", "/api/cart", Some(json!({ "productId": item["id"], "quantity": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Item added to cart");

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["itemCount"], 3);
    assert_eq!(cart["items"][0]["id"], "4");
}

#[tokio::test]
async fn test_add_errors() {
    let app = setup().await;

    let (status, json) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "42", "quantity": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (status, json) = send(&app, "POST", "/api/cart", Some(json!({ "quantity": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REQUEST");

    let (status, _) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "1", "quantity": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "1", "quantity": "two" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_update_and_remove() {
    let app = setup().await;
    let (_, added) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "2", "quantity": 1 }))).await;
    let id = added["cartItemId"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "PUT", &format!("/api/cart/{id}"), Some(json!({ "quantity": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Cart item updated");
    assert_eq!(json["cartItemId"], id.as_str());

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["itemCount"], 4);

    let (status, json) = send(&app, "PUT", &format!("/api/cart/{id}"), Some(json!({ "quantity": 0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Item removed from cart");
    assert!(json.get("cartItemId").is_none());

    let (status, json) = send(&app, "DELETE", &format!("/api/cart/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], format!("Cart item not found: {id}"));
}

#[tokio::test]
async fn test_delete_removes_line() {
    let app = setup().await;
    let (_, added) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "3", "quantity": 1 }))).await;
    let id = added["cartItemId"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "DELETE", &format!("/api/cart/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Item removed from cart");

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["itemCount"], 0);
}

#[tokio::test]
async fn test_checkout_flow() {
    let app = setup().await;
    send(&app, "POST", "/api/cart", Some(json!({ "productId": "1", "quantity": 1 }))).await;
    send(&app, "POST", "/api/cart", Some(json!({ "productId": "4", "quantity": 2 }))).await;

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    let (status, receipt) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({ "cartItems": cart["items"], "customerInfo": customer() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 99.99 + 2 × 249.99 = 599.97; × 0.08 = 47.9976
    assert_eq!(receipt["total"], 599.97);
    assert_eq!(receipt["tax"], 48.0);
    assert_eq!(receipt["grandTotal"], 647.97);
    assert_eq!(receipt["customerInfo"]["email"], "ada@example.com");
    assert_eq!(receipt["items"].as_array().unwrap().len(), 2);
    assert!(receipt["orderId"].is_string());
    assert!(receipt["timestamp"].is_string());
    assert!(receipt.get("warnings").is_none());

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["itemCount"], 0);
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_uses_submitted_prices() {
    let app = setup().await;
    let (status, receipt) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({
            "cartItems": [{
                "cartItemId": "client-line",
                "id": "1",
                "name": "Wireless Headphones",
                "price": 1.0049,
                "quantity": 1
            }],
            "customerInfo": customer()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["total"], 1.0);
    assert_eq!(receipt["tax"], 0.08);
    assert_eq!(receipt["grandTotal"], 1.09);
}

#[tokio::test]
async fn test_checkout_echoes_minimal_items() {
    let app = setup().await;
    let submitted = json!([{ "id": "1", "price": 10.0, "quantity": 1, "sku": "X" }]);

    let (status, receipt) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({ "cartItems": submitted, "customerInfo": customer() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["items"], submitted);
    assert_eq!(receipt["total"], 10.0);
    assert_eq!(receipt["tax"], 0.8);
    assert_eq!(receipt["grandTotal"], 10.8);
}

#[tokio::test]
async fn test_checkout_rejections_leave_cart() {
    let app = setup().await;
    send(&app, "POST", "/api/cart", Some(json!({ "productId": "5", "quantity": 1 }))).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({ "cartItems": [], "customerInfo": customer() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REQUEST");

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({ "cartItems": cart["items"], "customerInfo": { "name": "Ada" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/checkout", Some(json!("not an object"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["itemCount"], 1);
}

#[tokio::test]
async fn test_checkout_reports_lines_added_after_read() {
    let app = setup().await;
    send(&app, "POST", "/api/cart", Some(json!({ "productId": "1", "quantity": 1 }))).await;
    let (_, cart) = send(&app, "GET", "/api/cart", None).await;

    send(&app, "POST", "/api/cart", Some(json!({ "productId": "2", "quantity": 1 }))).await;

    let (status, receipt) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({ "cartItems": cart["items"], "customerInfo": customer() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["warnings"].as_array().unwrap().len(), 1);
    assert_eq!(receipt["total"], 99.99);
}

#[tokio::test]
async fn test_reinsert_policy_assigns_fresh_id() {
    let config = AppConfig {
        quantity_update: QuantityUpdatePolicy::Reinsert,
        ..AppConfig::default()
    };
    let app = setup_with(config).await;

    let (_, added) = send(&app, "POST", "/api/cart", Some(json!({ "productId": "2", "quantity": 1 }))).await;
    let id = added["cartItemId"].as_str().unwrap().to_string();

    let (status, json) = send(&app, "PUT", &format!("/api/cart/{id}"), Some(json!({ "quantity": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(json["cartItemId"], id.as_str());

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["items"][0]["cartItemId"], json["cartItemId"]);
    assert_eq!(cart["itemCount"], 3);
}

#[tokio::test]
async fn test_sqlite_backend_flow() {
    let config = AppConfig {
        store: StoreBackend::Sqlite,
        ..AppConfig::default()
    };
    let app = setup_with(config).await;

    send(&app, "POST", "/api/cart", Some(json!({ "productId": "3", "quantity": 1 }))).await;
    send(&app, "POST", "/api/cart", Some(json!({ "productId": "3", "quantity": 1 }))).await;

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total"], 2599.98);

    let (status, receipt) = send(
        &app,
        "POST",
        "/api/checkout",
        Some(json!({ "cartItems": cart["items"], "customerInfo": customer() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["grandTotal"], 2807.98);

    let (_, cart) = send(&app, "GET", "/api/cart", None).await;
    assert_eq!(cart["itemCount"], 0);
}
