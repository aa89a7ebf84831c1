//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (stricter CSP for admin)
//! 4. Session layer (tower-sessions, SameSite=Strict)
//! 5. Session expiry (drop the token after a backend 401)
//!
//! Authorization is per handler through the [`RequireAdmin`] extractor.

pub mod auth;
pub mod security_headers;
pub mod session;
pub mod session_expiry;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use session_expiry::session_expiry_middleware;
