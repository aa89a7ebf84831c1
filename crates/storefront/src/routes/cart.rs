//! Cart route handlers.
//!
//! The cart lives in the session (see [`crate::cart`]) and is only sent to
//! the backend at checkout. Mutations answer HTMX requests with fragments
//! and a `cart-updated` trigger, and plain form posts with a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use snackshop_core::{Cart, CartError, CartItem, ProductId, Toast};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::cart_store;
use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::Layout;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    /// Highest quantity the stepper offers; 0 when stock is unknown.
    pub max_quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            quantity: item.quantity,
            max_quantity: item.stock,
            price: snackshop_core::Price::of(item.price).display(),
            line_price: snackshop_core::Price::of(item.line_total()).display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.display_subtotal(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Whether the request came from HTMX.
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some_and(|v| v == "true")
}

/// Answer a cart mutation: the items fragment for HTMX, a redirect to the
/// cart page otherwise. A refused change becomes a toast.
async fn respond(
    session: &Session,
    headers: &HeaderMap,
    outcome: std::result::Result<Cart, CartError>,
    success: &str,
) -> Result<Response> {
    let cart = match outcome {
        Ok(cart) => {
            if !is_htmx(headers) {
                flash::push(session, Toast::success(success)).await?;
            }
            cart
        }
        Err(CartError::Storage(e)) => return Err(e.into()),
        Err(e) => {
            if is_htmx(headers) {
                return Err(e.into());
            }
            flash::push(session, Toast::warning(e.to_string())).await?;
            cart_store(session).load().await?
        }
    };

    if is_htmx(headers) {
        return Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response());
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Display cart page.
#[instrument(skip(session, layout))]
pub async fn show(session: Session, layout: Layout) -> Result<impl IntoResponse> {
    let cart = cart_store(&session).load().await?;
    Ok(CartShowTemplate {
        layout,
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart, merging with an existing line.
///
/// The product is fetched first so the cart holds current price and stock.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.api().product(form.product_id).await?;
    let quantity = form.quantity.unwrap_or(1);
    let outcome = cart_store(&session)
        .update(|cart| cart.add(&product, quantity).map(|_| ()))
        .await
        .map(|(cart, ())| cart);

    if is_htmx(&headers) {
        let cart = outcome?;
        return Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response());
    }

    match outcome {
        Ok(_) => {
            flash::push(&session, Toast::success(format!("Added {} to your cart", product.name)))
                .await?;
        }
        Err(CartError::Storage(e)) => return Err(e.into()),
        Err(e) => flash::push(&session, Toast::warning(e.to_string())).await?,
    }
    Ok(Redirect::to(&format!("/products/{}", product.id)).into_response())
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let outcome = cart_store(&session)
        .update(|cart| cart.set_quantity(form.product_id, form.quantity))
        .await
        .map(|(cart, _)| cart);
    respond(&session, &headers, outcome, "Cart updated").await
}

/// Remove a line.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let outcome = cart_store(&session)
        .update(|cart| Ok(cart.remove(form.product_id)))
        .await
        .map(|(cart, _)| cart);
    respond(&session, &headers, outcome, "Removed from cart").await
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let outcome = cart_store(&session)
        .update(|cart| {
            cart.clear();
            Ok(())
        })
        .await
        .map(|(cart, ())| cart);
    respond(&session, &headers, outcome, "Cart cleared").await
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let count = match cart_store(&session).load().await {
        Ok(cart) => cart.item_count(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load cart count");
            0
        }
    };
    CartCountTemplate { count }
}
