//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (keyword, category, page)
//!
//! # Products
//! GET  /products/{id}          - Product detail with reviews
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (merges by product)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Address pick and order summary
//! POST /checkout               - Place order
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history (?status= tab)
//! GET  /orders/{id}            - Order detail
//! POST /orders/{id}/cancel     - Cancel
//! POST /orders/{id}/receive    - Confirm receipt
//! POST /orders/{id}/review     - Review a line
//!
//! # Favorites (requires auth)
//! GET  /favorites              - Saved products
//! POST /favorites/{id}         - Save
//! POST /favorites/{id}/remove  - Forget
//!
//! # Addresses (requires auth)
//! GET  /addresses              - Address book (?edit={id})
//! POST /addresses              - Create
//! POST /addresses/{id}         - Update
//! POST /addresses/{id}/delete  - Delete
//! POST /addresses/{id}/default - Make default
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (rate limited)
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action (rate limited)
//! POST /auth/logout            - Logout action
//! ```

pub mod addresses;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{MethodRouter, get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

fn limited(route: MethodRouter<AppState>, enabled: bool) -> MethodRouter<AppState> {
    if enabled {
        route.layer(auth_rate_limiter())
    } else {
        route
    }
}

/// Create the auth routes router.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(limited(post(auth::login), rate_limit)),
        )
        .route(
            "/register",
            get(auth::register_page).merge(limited(post(auth::register), rate_limit)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/receive", post(orders::receive))
        .route("/{id}/review", post(orders::review))
}

/// Create the favorite routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route("/{id}", post(favorites::add))
        .route("/{id}/remove", post(favorites::remove))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::index).post(addresses::create))
        .route("/{id}", post(addresses::update))
        .route("/{id}/delete", post(addresses::delete))
        .route("/{id}/default", post(addresses::make_default))
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place))
        .nest("/orders", order_routes())
        .nest("/favorites", favorite_routes())
        .nest("/addresses", address_routes())
        .nest("/auth", auth_routes(rate_limit))
}
