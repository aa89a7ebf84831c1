//! Snackshop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` only adds
//! logging, Sentry and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod filters;
pub mod flash;
pub mod layout;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Directory holding CSS and images, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full storefront application with all middleware.
pub fn build_app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let rate_limit = state.config().rate_limit;

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes(rate_limit))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(middleware::session_expiry_middleware))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Request span with an empty `request_id` for the request id middleware
/// to fill in.
fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the backend answers its health check.
/// Returns 503 Service Unavailable if it does not.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().health().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Backend not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;

    fn app() -> Router {
        // Nothing listens on the discard port, so backend calls fail fast.
        let state = AppState::new(StorefrontConfig::local("http://127.0.0.1:9")).unwrap();
        build_app(state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_carries_security_headers() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
        assert!(response.headers().contains_key("x-request-id"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_upstream_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "edge-42")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "edge-42");
    }

    #[tokio::test]
    async fn test_readiness_fails_without_backend() {
        let response = app().oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_account_pages_redirect_anonymous_visitors() {
        let response = app().oneshot(get("/orders")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }
}
