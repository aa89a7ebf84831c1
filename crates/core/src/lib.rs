//! Snackshop Core - Shared types library.
//!
//! This crate provides common types used across all Snackshop components:
//! - `storefront` - Public-facing snack shop
//! - `admin` - Store administration console
//! - `cli` - Command-line tools for catalog seeding and user management
//!
//! # Architecture
//!
//! The backend REST service is the system of record. This crate mirrors its
//! records, owns the one piece of client-side state (the cart), and with the
//! `client` feature provides the typed HTTP client used by every binary.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`models`] - Records mirrored from backend JSON
//! - [`storage`] - Key-value store interface backing the cart
//! - [`cart`] - Cart merge-by-id logic
//! - [`validation`] - Required-field checks run before any backend call
//! - [`toast`] - User-facing notifications
//! - `api` - Backend REST client (feature `client`)

#![cfg_attr(not(test), forbid(unsafe_code))]

#[cfg(feature = "client")]
pub mod api;
pub mod cart;
pub mod models;
pub mod storage;
pub mod toast;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartError, CartItem, CartStore};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use toast::{Toast, ToastLevel};
pub use types::*;
pub use validation::{Validate, ValidationErrors};
