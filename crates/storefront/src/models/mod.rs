//! Storefront-local models.
//!
//! Backend records live in `snackshop_core::models`; this module only holds
//! what the storefront keeps in the session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
