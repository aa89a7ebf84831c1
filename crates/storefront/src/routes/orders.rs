//! Order history, order detail, and the customer-side order actions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use snackshop_core::models::{NewReview, Order, OrderDetail};
use snackshop_core::{OrderId, OrderStatus, Price, ProductId, Toast, Validate};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Status filter tab.
#[derive(Clone)]
pub struct StatusTabView {
    /// Wire value for the `status` query parameter; empty for "All".
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Build the tab bar with `current` highlighted.
#[must_use]
pub fn status_tabs(current: Option<OrderStatus>) -> Vec<StatusTabView> {
    std::iter::once(StatusTabView {
        value: "",
        label: "All",
        active: current.is_none(),
    })
    .chain(OrderStatus::ALL.into_iter().map(|status| StatusTabView {
        value: status.as_str(),
        label: status.label(),
        active: current == Some(status),
    }))
    .collect()
}

/// Parse the `status` query parameter; unknown values mean "all".
#[must_use]
pub fn parse_status(raw: Option<&str>) -> Option<OrderStatus> {
    raw.filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse().ok())
}

/// Order row in the history list.
#[derive(Clone)]
pub struct OrderSummaryView {
    pub id: OrderId,
    pub order_no: String,
    pub status: &'static str,
    pub status_class: &'static str,
    pub total: String,
    pub item_count: u32,
    pub placed_at: String,
    pub first_item: String,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_no: order.order_no.clone(),
            status: order.status.label(),
            status_class: order.status.as_str(),
            total: order.display_total(),
            item_count: order.item_count(),
            placed_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            first_item: order
                .details
                .first()
                .map(|d| d.product_name.clone())
                .unwrap_or_default(),
        }
    }
}

/// Order line on the detail page.
#[derive(Clone)]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub price: String,
    pub quantity: u32,
    pub subtotal: String,
    pub can_review: bool,
}

impl OrderLineView {
    fn new(detail: &OrderDetail, reviewable: bool) -> Self {
        Self {
            product_id: detail.product_id,
            name: detail.product_name.clone(),
            image_url: detail.product_image.clone(),
            price: Price::of(detail.price).display(),
            quantity: detail.quantity,
            subtotal: Price::of(detail.subtotal()).display(),
            can_review: reviewable && !detail.reviewed,
        }
    }
}

/// Full order for the detail page.
#[derive(Clone)]
pub struct OrderView {
    pub summary: OrderSummaryView,
    pub receiver: String,
    pub phone: String,
    pub address: String,
    pub note: Option<String>,
    pub lines: Vec<OrderLineView>,
    pub can_cancel: bool,
    pub can_confirm_receipt: bool,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let reviewable = order.status.reviewable();
        Self {
            summary: OrderSummaryView::from(order),
            receiver: order.receiver_name.clone(),
            phone: order.receiver_phone.clone(),
            address: order.shipping_address.clone(),
            note: order.note.clone().filter(|n| !n.trim().is_empty()),
            lines: order
                .details
                .iter()
                .map(|d| OrderLineView::new(d, reviewable))
                .collect(),
            can_cancel: order.status.customer_can_cancel(),
            can_confirm_receipt: order.status.customer_can_confirm_receipt(),
        }
    }
}

/// Order filter query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub tabs: Vec<StatusTabView>,
    pub orders: Vec<OrderSummaryView>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub order: OrderView,
}

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub product_id: ProductId,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub content: String,
}

/// List the shopper's orders, optionally filtered by status.
#[instrument(skip(state, user, layout), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    layout: Layout,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let status = parse_status(query.status.as_deref());
    let orders = state.api().my_orders(&user.token, status).await?;

    Ok(OrdersIndexTemplate {
        layout,
        tabs: status_tabs(status),
        orders: orders.iter().map(OrderSummaryView::from).collect(),
    })
}

/// Show one order.
#[instrument(skip(state, user, layout), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    layout: Layout,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = state.api().order(&user.token, id).await?;
    Ok(OrderShowTemplate {
        layout,
        order: OrderView::from(&order),
    })
}

/// Cancel an order that has not shipped.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    let back = Redirect::to(&format!("/orders/{id}"));
    let order = state.api().order(&user.token, id).await?;
    if !order.status.customer_can_cancel() {
        tracing::info!(current = %order.status, "Refused order cancellation");
        let message = format!(
            "An order that is {} cannot be cancelled",
            order.status.label().to_lowercase()
        );
        flash::push(&session, Toast::warning(message)).await?;
        return Ok(back);
    }

    let result = state.api().cancel_order(&user.token, id).await;
    flash::outcome(&session, result, "Order cancelled").await?;
    Ok(back)
}

/// Confirm a shipped order arrived.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn receive(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    let back = Redirect::to(&format!("/orders/{id}"));
    let order = state.api().order(&user.token, id).await?;
    if !order.status.customer_can_confirm_receipt() {
        tracing::info!(current = %order.status, "Refused receipt confirmation");
        flash::push(
            &session,
            Toast::warning("Only a shipped order can be confirmed as received"),
        )
        .await?;
        return Ok(back);
    }

    let result = state.api().confirm_receipt(&user.token, id).await;
    flash::outcome(&session, result, "Thanks for confirming receipt").await?;
    Ok(back)
}

/// Review one line of a completed order.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn review(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect> {
    let back = Redirect::to(&format!("/orders/{id}"));
    let review = NewReview {
        product_id: form.product_id,
        order_id: id,
        rating: form.rating,
        content: form.content.trim().to_string(),
    };
    if let Err(errors) = review.validate() {
        flash::push(&session, Toast::warning(errors.to_string())).await?;
        return Ok(back);
    }

    let result = state.api().post_review(&user.token, &review).await;
    flash::outcome(&session, result, "Thanks for your review").await?;
    Ok(back)
}
