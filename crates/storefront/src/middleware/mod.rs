//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. CSP nonce (generate per-request nonce for inline scripts)
//! 5. Security headers (CSP built from the nonce above)
//! 6. Session layer (tower-sessions with in-memory store)
//! 7. Session expiry (drop the token after a backend 401)
//! 8. Rate limiting on auth posts (governor)

pub mod auth;
pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_expiry;

pub use auth::{RequireAuth, clear_current_user, set_current_user, take_return_to};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use session_expiry::session_expiry_middleware;
