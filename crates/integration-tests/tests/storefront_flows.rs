//! Shopper flows through the storefront against a mocked backend.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;
use snackshop_core::toast;
use snackshop_integration_tests::{TestApp, fixtures, location, mock_login, spawn_storefront};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_product(backend: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::product(1, "Sea Salt Chips", "3.50")),
        )
        .mount(backend)
        .await;
}

async fn add_to_cart(app: &TestApp, quantity: &str) {
    let response = app
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", quantity)])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products/1");
}

async fn cart_count(app: &TestApp) -> String {
    app.get("/cart/count").await.text().await.unwrap()
}

async fn signed_in(backend: &MockServer) -> TestApp {
    mock_login(backend, "CUSTOMER").await;
    let app = spawn_storefront(backend).await;
    let response = app.login("ann").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    app
}

#[tokio::test]
async fn health_is_ok_without_backend_calls() {
    let backend = MockServer::start().await;
    let app = spawn_storefront(&backend).await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn adding_the_same_product_merges_lines() {
    let backend = MockServer::start().await;
    mock_product(&backend).await;
    let app = spawn_storefront(&backend).await;

    assert_eq!(cart_count(&app).await.trim(), "");
    add_to_cart(&app, "1").await;
    add_to_cart(&app, "1").await;

    assert!(cart_count(&app).await.contains(r#"<span class="badge">2</span>"#));
}

#[tokio::test]
async fn pages_behind_auth_redirect_to_login() {
    let backend = MockServer::start().await;
    let app = spawn_storefront(&backend).await;

    for page in ["/orders", "/checkout", "/favorites", "/addresses"] {
        let response = app.get(page).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{page}");
        assert_eq!(location(&response), "/auth/login", "{page}");
    }
}

#[tokio::test]
async fn login_returns_to_the_page_that_asked() {
    let backend = MockServer::start().await;
    mock_login(&backend, "CUSTOMER").await;
    let app = spawn_storefront(&backend).await;

    app.get("/favorites").await;
    let response = app.login("ann").await;
    assert_eq!(location(&response), "/favorites");
}

#[tokio::test]
async fn bad_credentials_rerender_the_form() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})))
        .mount(&backend)
        .await;
    let app = spawn_storefront(&backend).await;

    let response = app.login("ann").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("ann"));
}

#[tokio::test]
async fn invalid_address_is_not_sent() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/addresses"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app
        .post_form(
            "/addresses",
            &[
                ("receiver_name", "Ann"),
                ("phone", "5550100"),
                ("province", "ON"),
                ("city", "Toronto"),
                ("district", "Downtown"),
                ("detail", "1 King St"),
                ("postal_code", ""),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Postal code is required"));
}

#[tokio::test]
async fn expired_token_signs_the_shopper_out() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/orders/my"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app.get("/orders").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");

    let page = app.get("/auth/login").await.text().await.unwrap();
    assert!(page.contains(toast::SESSION_EXPIRED));

    // The token is gone, so the guard answers without asking the backend.
    let response = app.get("/orders").await;
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn checkout_sends_cart_lines_and_empties_cart() {
    let backend = MockServer::start().await;
    mock_product(&backend).await;
    let app = signed_in(&backend).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "addressId": 4,
            "items": [{"productId": 1, "quantity": 2}],
            "note": "Leave at the door"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::order(42, "PENDING")))
        .expect(1)
        .mount(&backend)
        .await;

    add_to_cart(&app, "2").await;
    let response = app
        .post_form(
            "/checkout",
            &[("address_id", "4"), ("note", "  Leave at the door ")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders/42");
    assert!(!cart_count(&app).await.contains("badge"));
}

#[tokio::test]
async fn checkout_with_empty_cart_goes_back_to_cart() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app.post_form("/checkout", &[("address_id", "4")]).await;
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn backend_failure_shows_generic_message() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/orders/my"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "NullPointerException"})),
        )
        .mount(&backend)
        .await;

    let response = app.get("/orders").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(body.contains(toast::SERVER_ERROR));
    assert!(!body.contains("NullPointerException"));
}

async fn mock_order(backend: &MockServer, id: i64, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/orders/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::order(id, status)))
        .mount(backend)
        .await;
}

#[tokio::test]
async fn shipped_order_cancel_is_not_sent() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    mock_order(&backend, 7, "SHIPPED").await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/7/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app.post_form("/orders/7/cancel", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders/7");

    let page = app.get("/orders/7").await.text().await.unwrap();
    assert!(page.contains("cannot be cancelled"));
}

#[tokio::test]
async fn pending_order_receipt_is_not_sent() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    mock_order(&backend, 8, "PENDING").await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/8/receive"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app.post_form("/orders/8/receive", &[]).await;
    assert_eq!(location(&response), "/orders/8");
}

#[tokio::test]
async fn pending_order_cancel_is_sent() {
    let backend = MockServer::start().await;
    let app = signed_in(&backend).await;
    mock_order(&backend, 9, "PENDING").await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/9/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app.post_form("/orders/9/cancel", &[]).await;
    assert_eq!(location(&response), "/orders/9");
}
