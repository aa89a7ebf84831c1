//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Dashboard
//! GET  /                         - Headline figures and revenue chart
//!
//! # Auth
//! GET  /auth/login               - Login page
//! POST /auth/login               - Login action (admins only)
//! POST /auth/logout              - Logout
//!
//! # Products
//! GET  /products                 - Product table (keyword, category_id, page)
//! GET  /products/new             - New product form
//! POST /products                 - Create
//! GET  /products/{id}/edit       - Edit form
//! POST /products/{id}            - Update
//! POST /products/{id}/status     - Toggle on sale / off shelf
//! POST /products/{id}/delete     - Delete
//!
//! # Categories
//! GET  /categories               - Category table and form (?edit={id})
//! POST /categories               - Create
//! POST /categories/{id}          - Update
//! POST /categories/{id}/delete   - Delete
//!
//! # Orders
//! GET  /orders                   - Order table (status, page)
//! GET  /orders/{id}              - Order detail
//! POST /orders/{id}/status       - Change status
//!
//! # Users
//! GET  /users                    - User table
//! POST /users/{id}/role          - Change role
//! POST /users/{id}/delete        - Delete
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}/status", post(products::toggle_status))
        .route("/{id}/delete", post(products::delete))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/{id}", post(categories::update))
        .route("/{id}/delete", post(categories::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::set_status))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{id}/role", post(users::set_role))
        .route("/{id}/delete", post(users::delete))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
}
