//! Checkout: pick an address, send the cart to the backend as an order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use snackshop_core::models::{Address, PlaceOrder};
use snackshop_core::{AddressId, Toast};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::cart_store;
use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Address choice on the checkout page.
#[derive(Clone)]
pub struct AddressOptionView {
    pub id: AddressId,
    pub receiver: String,
    pub phone: String,
    pub line: String,
    pub selected: bool,
}

impl AddressOptionView {
    fn list(addresses: &[Address]) -> Vec<Self> {
        let preferred = Address::preferred(addresses).map(|a| a.id);
        addresses
            .iter()
            .map(|a| Self {
                id: a.id,
                receiver: a.receiver_name.clone(),
                phone: a.phone.clone(),
                line: a.one_line(),
                selected: Some(a.id) == preferred,
            })
            .collect()
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub addresses: Vec<AddressOptionView>,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub address_id: Option<AddressId>,
    #[serde(default)]
    pub note: String,
}

/// Display the checkout page.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    layout: Layout,
) -> Result<Response> {
    let cart = cart_store(&session).load().await?;
    if cart.is_empty() {
        flash::push(&session, Toast::info("Your cart is empty")).await?;
        return Ok(Redirect::to("/cart").into_response());
    }
    let addresses = state.api().addresses(&user.token).await?;

    Ok(CheckoutTemplate {
        layout,
        cart: CartView::from(&cart),
        addresses: AddressOptionView::list(&addresses),
    }
    .into_response())
}

/// Place the order.
///
/// On success the cart is emptied and the shopper lands on the new order.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let store = cart_store(&session);
    let cart = store.load().await?;
    if cart.is_empty() {
        flash::push(&session, Toast::info("Your cart is empty")).await?;
        return Ok(Redirect::to("/cart").into_response());
    }
    let Some(address_id) = form.address_id else {
        flash::push(&session, Toast::warning("Choose a shipping address")).await?;
        return Ok(Redirect::to("/checkout").into_response());
    };

    let note = form.note.trim();
    let order = PlaceOrder {
        address_id,
        items: cart.checkout_lines(),
        note: (!note.is_empty()).then(|| note.to_string()),
    };
    let result = state.api().place_order(&user.token, &order).await;

    match flash::outcome(&session, result, "Order placed").await? {
        Some(order) => {
            store.clear().await?;
            tracing::info!(order_id = %order.id, order_no = %order.order_no, "Order placed");
            Ok(Redirect::to(&format!("/orders/{}", order.id)).into_response())
        }
        None => Ok(Redirect::to("/checkout").into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: i64, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            receiver_name: "Ann".to_string(),
            phone: "5550100".to_string(),
            province: "ON".to_string(),
            city: "Toronto".to_string(),
            district: "Downtown".to_string(),
            detail: "1 King St".to_string(),
            postal_code: "100001".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_default_address_is_preselected() {
        let options = AddressOptionView::list(&[address(1, false), address(2, true)]);
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }
}
