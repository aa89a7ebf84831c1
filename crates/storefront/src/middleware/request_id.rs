//! Request ID middleware for request tracing and correlation.
//!
//! Reuses an upstream `x-request-id` when one is present, otherwise mints a
//! UUID v4. The id is recorded on the request span, tagged on the Sentry
//! scope, stored in request extensions and echoed on the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// The id of the current request.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn upstream_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_ID_LEN)
        .map(String::from)
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_oversized_upstream_id_is_ignored() {
        let long = "x".repeat(MAX_UPSTREAM_ID_LEN + 1);
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, long)
            .body(Body::empty())
            .unwrap_or_default();
        assert!(upstream_id(&request).is_none());

        let request = Request::builder()
            .header(REQUEST_ID_HEADER, " abc ")
            .body(Body::empty())
            .unwrap_or_default();
        assert_eq!(upstream_id(&request).as_deref(), Some("abc"));
    }
}
