//! `ApiClient` against a mocked backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use serde_json::json;
use snackshop_core::api::{ApiClient, ApiError, ErrorKind};
use snackshop_core::models::{LoginRequest, ProductQuery};
use snackshop_core::{AuthToken, CategoryId, ProductId, Toast, toast};
use snackshop_integration_tests::fixtures;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn login_decodes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::auth_session(1, "root", "ADMIN")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = client(&server)
        .login(&LoginRequest {
            username: "root".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.user.username, "root");
    assert!(session.user.is_admin());
    assert_eq!(session.token.expose(), fixtures::TOKEN);
}

#[tokio::test]
async fn authenticated_calls_send_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/3"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::order(3, "PAID")))
        .expect(1)
        .mount(&server)
        .await;

    let token = AuthToken::new("abc123");
    let order = client(&server)
        .order(&token, snackshop_core::OrderId::new(3))
        .await
        .unwrap();
    assert_eq!(order.order_no, "SN000003");
    assert_eq!(order.item_count(), 2);
}

#[tokio::test]
async fn product_listing_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("keyword", "salt"))
        .and(query_param("categoryId", "1"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [fixtures::product(1, "Sea Salt Chips", "3.50")],
            "total": 11,
            "page": 2,
            "size": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .products(
            &ProductQuery {
                keyword: Some("  salt ".to_string()),
                category_id: Some(CategoryId::new(1)),
                page: Some(2),
                size: None,
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, ProductId::new(1));
    assert_eq!(page.total_pages(), 2);
}

#[tokio::test]
async fn error_body_message_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).product(ProductId::new(9)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        &err,
        ApiError::Status { status: 404, message: Some(m) } if m == "Product not found"
    ));
    assert_eq!(Toast::from_api_error(&err).message, toast::NOT_FOUND);
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server)
        .me(&AuthToken::new("stale"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).categories().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.kind(), ErrorKind::Server);
}

#[tokio::test]
async fn health_reports_backend_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).health().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
}
