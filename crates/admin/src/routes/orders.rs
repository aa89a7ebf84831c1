//! Order management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use snackshop_core::models::{Order, OrderDetail};
use snackshop_core::{OrderId, OrderStatus, Price, Toast};
use tower_sessions::Session;
use tracing::instrument;

use crate::components::Pagination;
use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::AdminLayout;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Rows per page in the order table.
pub const PAGE_SIZE: u32 = 10;

/// One tab in the status filter bar.
#[derive(Debug, Clone)]
pub struct StatusTab {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

fn status_tabs(current: Option<OrderStatus>) -> Vec<StatusTab> {
    let mut tabs = vec![StatusTab {
        value: "",
        label: "All",
        active: current.is_none(),
    }];
    tabs.extend(OrderStatus::ALL.into_iter().map(|status| StatusTab {
        value: status.as_str(),
        label: status.label(),
        active: current == Some(status),
    }));
    tabs
}

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
}

impl OrdersQuery {
    /// Unknown or blank statuses mean "all".
    fn status(&self) -> Option<OrderStatus> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| s.parse().ok())
    }
}

/// Order row for templates.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: OrderId,
    pub order_no: String,
    pub customer: String,
    pub receiver: String,
    pub total: String,
    pub item_count: u32,
    pub status: &'static str,
    pub status_class: &'static str,
    pub placed_at: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_no: order.order_no.clone(),
            customer: order.username.clone().unwrap_or_default(),
            receiver: order.receiver_name.clone(),
            total: order.display_total(),
            item_count: order.item_count(),
            status: order.status.label(),
            status_class: order.status.as_str(),
            placed_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Line item for the detail page.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl From<&OrderDetail> for OrderLineView {
    fn from(detail: &OrderDetail) -> Self {
        Self {
            name: detail.product_name.clone(),
            price: Price::of(detail.price).display(),
            quantity: detail.quantity,
            subtotal: Price::of(detail.subtotal()).display(),
        }
    }
}

/// A status change button.
#[derive(Debug, Clone)]
pub struct TransitionView {
    pub value: &'static str,
    pub label: String,
    pub danger: bool,
}

/// Status changes an admin may make from `status`, advance first.
#[must_use]
pub fn transitions(status: OrderStatus) -> Vec<TransitionView> {
    OrderStatus::ALL
        .into_iter()
        .filter(|target| status.admin_can_transition_to(*target))
        .map(|target| TransitionView {
            value: target.as_str(),
            label: if target == OrderStatus::Cancelled {
                "Cancel order".to_string()
            } else {
                format!("Mark as {}", target.label().to_lowercase())
            },
            danger: target == OrderStatus::Cancelled,
        })
        .collect()
}

/// Order list page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: AdminLayout,
    pub tabs: Vec<StatusTab>,
    pub orders: Vec<OrderRowView>,
    pub pagination: Pagination,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: AdminLayout,
    pub order: OrderRowView,
    pub phone: String,
    pub address: String,
    pub note: Option<String>,
    pub lines: Vec<OrderLineView>,
    pub transitions: Vec<TransitionView>,
}

/// Order list handler.
///
/// GET /orders
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: AdminLayout,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let status = query.status();
    let page = query.page.unwrap_or(1).max(1);
    let orders = state
        .api()
        .all_orders(&admin.token, status, page, PAGE_SIZE)
        .await?;

    let carried = [(
        "status",
        status.map(|s| s.as_str().to_string()).unwrap_or_default(),
    )];

    Ok(OrdersIndexTemplate {
        layout,
        tabs: status_tabs(status),
        orders: orders.items.iter().map(OrderRowView::from).collect(),
        pagination: Pagination::new(&orders, "/orders", &carried),
    })
}

/// Order detail handler.
///
/// GET /orders/{id}
#[instrument(skip_all, fields(order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: AdminLayout,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = state.api().order(&admin.token, id).await?;

    Ok(OrderShowTemplate {
        layout,
        order: OrderRowView::from(&order),
        phone: order.receiver_phone.clone(),
        address: order.shipping_address.clone(),
        note: order.note.clone().filter(|n| !n.trim().is_empty()),
        lines: order.details.iter().map(OrderLineView::from).collect(),
        transitions: transitions(order.status),
    })
}

/// Requested status.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// Move an order along its lifecycle.
///
/// Moves the lifecycle does not allow are refused without calling the
/// backend.
///
/// POST /orders/{id}/status
#[instrument(skip_all, fields(admin_id = %admin.id, order_id = %id, target = %form.status))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let back = format!("/orders/{id}");
    let order = state.api().order(&admin.token, id).await?;

    if !order.status.admin_can_transition_to(form.status) {
        tracing::info!(current = %order.status, "Refused order status change");
        flash::push(
            &session,
            Toast::warning(format!(
                "An order that is {} cannot become {}",
                order.status.label().to_lowercase(),
                form.status.label().to_lowercase()
            )),
        )
        .await?;
        return Ok(Redirect::to(&back));
    }

    let result = state
        .api()
        .set_order_status(&admin.token, id, form.status)
        .await;
    let message = format!("Order {} is now {}", order.order_no, form.status.label().to_lowercase());
    flash::outcome(&session, result, &message).await?;
    Ok(Redirect::to(&back))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_from_paid() {
        let values: Vec<&str> = transitions(OrderStatus::Paid)
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec!["SHIPPED", "CANCELLED"]);
    }

    #[test]
    fn test_finished_orders_have_no_transitions() {
        assert!(transitions(OrderStatus::Completed).is_empty());
        assert!(transitions(OrderStatus::Cancelled).is_empty());
    }

    #[test]
    fn test_cancel_is_flagged_as_danger() {
        let cancel = transitions(OrderStatus::Pending)
            .into_iter()
            .find(|t| t.danger)
            .map(|t| t.label);
        assert_eq!(cancel.as_deref(), Some("Cancel order"));
    }

    #[test]
    fn test_unknown_status_lists_everything() {
        let query = OrdersQuery {
            status: Some("lost".to_string()),
            page: None,
        };
        assert_eq!(query.status(), None);
        assert!(status_tabs(query.status()).first().is_some_and(|t| t.active));
    }
}
