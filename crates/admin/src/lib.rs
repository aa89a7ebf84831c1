//! Snackshop Admin library.
//!
//! This crate provides the admin console as a library, allowing it to be
//! tested and reused.
//!
//! # Security
//!
//! Every page except login requires a session whose backend account has the
//! `Admin` role. The console serves no scripts and sends a strict CSP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod flash;
pub mod layout;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{Request, Response, StatusCode},
    middleware::from_fn,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Directory holding the console stylesheet, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the full admin application with all middleware.
pub fn build_app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(middleware::session_expiry_middleware))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the backend does not answer.
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
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AdminConfig;

    fn app() -> Router {
        let state = AppState::new(AdminConfig::local("http://127.0.0.1:9")).unwrap();
        build_app(state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_not_cached() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_console_requires_sign_in() {
        let response = app().oneshot(get("/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/auth/login");
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let response = app().oneshot(get("/auth/login")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
