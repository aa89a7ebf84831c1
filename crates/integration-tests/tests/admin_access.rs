//! Admin console access control and guarded actions.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;
use snackshop_admin::routes::auth::{INVALID_CREDENTIALS, NOT_AN_ADMIN};
use snackshop_integration_tests::{TestApp, fixtures, location, mock_login, spawn_admin};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn signed_in_admin(backend: &MockServer) -> TestApp {
    mock_login(backend, "ADMIN").await;
    let app = spawn_admin(backend).await;
    let response = app.login("root").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    app
}

#[tokio::test]
async fn console_pages_require_sign_in() {
    let backend = MockServer::start().await;
    let app = spawn_admin(&backend).await;

    for page in ["/", "/products", "/categories", "/orders", "/users"] {
        let response = app.get(page).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{page}");
        assert_eq!(location(&response), "/auth/login", "{page}");
    }
}

#[tokio::test]
async fn customer_accounts_are_refused() {
    let backend = MockServer::start().await;
    mock_login(&backend, "CUSTOMER").await;
    let app = spawn_admin(&backend).await;

    let response = app.login("ann").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.text().await.unwrap().contains(NOT_AN_ADMIN));

    // Nothing was stored, so the console still sends them to login.
    let response = app.get("/").await;
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn wrong_password_shows_generic_message() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&backend)
        .await;
    let app = spawn_admin(&backend).await;

    let response = app.login("root").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains(INVALID_CREDENTIALS));
}

#[tokio::test]
async fn admin_sees_dashboard() {
    let backend = MockServer::start().await;
    let app = signed_in_admin(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalRevenue": "1234.50",
            "totalOrders": 87,
            "totalUsers": 40,
            "totalProducts": 25,
            "pendingOrders": 3
        })))
        .expect(1)
        .mount(&backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/revenue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2024-05-01", "revenue": "100.00", "orders": 4},
            {"date": "2024-05-02", "revenue": "50.00", "orders": 2}
        ])))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("$1,234.50") || body.contains("$1234.50"));
    assert!(body.contains("05-02"));
}

#[tokio::test]
async fn refused_order_transition_is_not_sent() {
    let backend = MockServer::start().await;
    let app = signed_in_admin(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/orders/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::order(5, "PENDING")))
        .mount(&backend)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/5/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app
        .post_form("/orders/5/status", &[("status", "SHIPPED")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders/5");
}

#[tokio::test]
async fn allowed_order_transition_is_sent() {
    let backend = MockServer::start().await;
    let app = signed_in_admin(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/orders/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::order(5, "PAID")))
        .mount(&backend)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/orders/5/status"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app
        .post_form("/orders/5/status", &[("status", "SHIPPED")])
        .await;
    assert_eq!(location(&response), "/orders/5");
}

#[tokio::test]
async fn admin_cannot_demote_themselves() {
    let backend = MockServer::start().await;
    let app = signed_in_admin(&backend).await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/users/1/role"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app
        .post_form("/users/1/role", &[("role", "CUSTOMER")])
        .await;
    assert_eq!(location(&response), "/users");
}

#[tokio::test]
async fn invalid_product_is_not_sent() {
    let backend = MockServer::start().await;
    let app = signed_in_admin(&backend).await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Chips"}])))
        .mount(&backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let response = app
        .post_form(
            "/products",
            &[("name", "Chips"), ("price", "free"), ("stock", "5"), ("category_id", "1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Enter a price such as 3.50"));
}
