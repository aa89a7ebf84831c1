//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. The script and style
//! sources are pinned to the per-request nonce from [`CspNonce`].

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Build the CSP for a response.
///
/// Product images are hosted by the backend or a CDN, so `img-src` allows
/// any https origin.
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let script = nonce.map_or_else(
        || "'self'".to_string(),
        |n| format!("'self' 'nonce-{}'", n.value()),
    );
    format!(
        "default-src 'none'; \
         script-src {script}; \
         style-src {script}; \
         font-src 'self'; \
         img-src 'self' https: data:; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: same-origin`
/// - `Content-Security-Policy` (see [`content_security_policy`])
/// - `Permissions-Policy` denying camera, microphone, geolocation and payment
/// - `Cache-Control: no-store` unless the handler set its own
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));

    match HeaderValue::from_str(&content_security_policy(nonce.as_ref())) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid CSP header value"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(), payment=()"),
    );

    // Pages carry cart and account data; static files set their own policy.
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_includes_nonce() {
        let nonce = CspNonce("abc123".to_string());
        let csp = content_security_policy(Some(&nonce));
        assert!(csp.contains("script-src 'self' 'nonce-abc123';"));
        assert!(csp.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_csp_without_nonce() {
        assert!(content_security_policy(None).contains("script-src 'self';"));
    }
}
