//! Integration test harness for Snackshop.
//!
//! Each test starts a `wiremock` server standing in for the REST backend,
//! then serves the storefront or admin router on an ephemeral local port and
//! drives it with a cookie-keeping `reqwest` client that does not follow
//! redirects.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p snackshop-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use axum::Router;
use reqwest::{Client, Response, redirect::Policy};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running app and a browser-like client for it.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    /// `POST path` with a urlencoded form body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Sign in through the login form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, username: &str) -> Response {
        self.post_form(
            "/auth/login",
            &[("username", username), ("password", "secret123")],
        )
        .await
    }
}

/// Serve `router` on `127.0.0.1:0` in the background.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn spawn(router: Router) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");

    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });

    let client = Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("failed to build test client");

    TestApp {
        base_url: format!("http://{addr}"),
        client,
    }
}

/// Start the storefront against `backend`.
///
/// # Panics
///
/// Panics if the app state cannot be built.
pub async fn spawn_storefront(backend: &MockServer) -> TestApp {
    use snackshop_storefront::{build_app, config::StorefrontConfig, state::AppState};

    let state = AppState::new(StorefrontConfig::local(backend.uri()))
        .expect("failed to build storefront state");
    spawn(build_app(state)).await
}

/// Start the admin console against `backend`.
///
/// # Panics
///
/// Panics if the app state cannot be built.
pub async fn spawn_admin(backend: &MockServer) -> TestApp {
    use snackshop_admin::{build_app, config::AdminConfig, state::AppState};

    let state =
        AppState::new(AdminConfig::local(backend.uri())).expect("failed to build admin state");
    spawn(build_app(state)).await
}

/// `Location` header of a redirect, or `""`.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Backend JSON fixtures.
pub mod fixtures {
    use super::{Value, json};

    /// Token the mocked backend hands out on login.
    pub const TOKEN: &str = "test-token";

    /// Login response for a user with `role` (`"CUSTOMER"` or `"ADMIN"`).
    #[must_use]
    pub fn auth_session(id: i64, username: &str, role: &str) -> Value {
        json!({
            "token": TOKEN,
            "user": {"id": id, "username": username, "role": role}
        })
    }

    /// An on-sale product with stock.
    #[must_use]
    pub fn product(id: i64, name: &str, price: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "price": price,
            "stock": 50,
            "status": "ON_SALE",
            "categoryId": 1,
            "categoryName": "Chips"
        })
    }

    /// An order in `status` with one line of product 1.
    #[must_use]
    pub fn order(id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "orderNo": format!("SN{id:06}"),
            "userId": 2,
            "username": "ann",
            "status": status,
            "totalAmount": "7.00",
            "receiverName": "Ann",
            "receiverPhone": "5550100",
            "shippingAddress": "1 King St, Downtown, Toronto, ON 100001",
            "createdAt": "2024-05-01T10:00:00",
            "details": [{
                "id": 1,
                "productId": 1,
                "productName": "Sea Salt Chips",
                "price": "3.50",
                "quantity": 2
            }]
        })
    }
}

/// Mount `POST /api/auth/login` answering with a session for `role`.
pub async fn mock_login(backend: &MockServer, role: &str) {
    let (id, username) = if role == "ADMIN" { (1, "root") } else { (2, "ann") };
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::auth_session(id, username, role)),
        )
        .mount(backend)
        .await;
}
