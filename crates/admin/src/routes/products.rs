//! Product management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use snackshop_core::models::{Category, Product, ProductInput, ProductQuery};
use snackshop_core::{CategoryId, ProductId, ProductStatus, Validate, ValidationErrors};
use tower_sessions::Session;
use tracing::instrument;

use crate::components::Pagination;
use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::AdminLayout;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Rows per page in the product table.
pub const PAGE_SIZE: u32 = 10;

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub keyword: Option<String>,
    pub category_id: Option<String>,
    pub page: Option<u32>,
}

impl ProductsQuery {
    fn category(&self) -> Option<CategoryId> {
        self.category_id
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
    }

    fn keyword(&self) -> String {
        self.keyword.as_deref().unwrap_or_default().trim().to_string()
    }
}

/// Product row for templates.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub category: String,
    pub price: String,
    pub stock: i32,
    pub sales: i32,
    pub status: &'static str,
    pub on_sale: bool,
    pub toggle_label: &'static str,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        let on_sale = product.status == ProductStatus::OnSale;
        Self {
            id: product.id,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            category: product.category_name.clone().unwrap_or_default(),
            price: product.display_price(),
            stock: product.stock,
            sales: product.sales,
            status: product.status.label(),
            on_sale,
            toggle_label: if on_sale { "Take off shelf" } else { "Put on sale" },
        }
    }
}

/// Category choice in filter and form selects.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub name: String,
    pub selected: bool,
}

fn category_options(categories: &[Category], selected: Option<CategoryId>) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id,
            name: c.name.clone(),
            selected: selected == Some(c.id),
        })
        .collect()
}

/// Raw product form. Numbers stay strings so bad input can be echoed back.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub image_url: String,
    pub category_id: String,
    pub on_sale: Option<String>,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
            category_id: product
                .category_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            on_sale: (product.status == ProductStatus::OnSale).then(|| "on".to_string()),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl ProductForm {
    /// A form for a new product: on sale, nothing else filled in.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            on_sale: Some("on".to_string()),
            ..Self::default()
        }
    }

    fn category(&self) -> Option<CategoryId> {
        self.category_id.trim().parse().ok()
    }

    /// Parse and validate into the backend's input shape.
    ///
    /// # Errors
    ///
    /// Returns every field problem, unparseable numbers first.
    pub fn to_input(&self) -> std::result::Result<ProductInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let price = self.price.trim().parse::<Decimal>().unwrap_or_else(|_| {
            errors.add("price", "Enter a price such as 3.50");
            Decimal::ZERO
        });
        let stock = match self.stock.trim() {
            "" => 0,
            raw => raw.parse::<i32>().unwrap_or_else(|_| {
                errors.add("stock", "Stock must be a whole number");
                0
            }),
        };

        let input = ProductInput {
            name: self.name.trim().to_string(),
            description: optional(&self.description),
            price,
            stock,
            image_url: optional(&self.image_url),
            category_id: self.category(),
            status: if self.on_sale.is_some() {
                ProductStatus::OnSale
            } else {
                ProductStatus::OffSale
            },
        };

        if let Err(rule_errors) = input.validate() {
            for error in rule_errors.errors() {
                errors.add(error.field, error.message.clone());
            }
        }
        errors.into_result().map(|()| input)
    }
}

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: AdminLayout,
    pub products: Vec<ProductRowView>,
    pub categories: Vec<CategoryOption>,
    pub keyword: String,
    pub pagination: Pagination,
}

/// New and edit product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: AdminLayout,
    pub title: String,
    pub action: String,
    pub form: ProductForm,
    pub categories: Vec<CategoryOption>,
    pub errors: ValidationErrors,
}

/// Product list handler.
///
/// GET /products
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    layout: AdminLayout,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let keyword = query.keyword();
    let category = query.category();
    let product_query = ProductQuery {
        keyword: Some(keyword.clone()),
        category_id: category,
        page: Some(query.page.unwrap_or(1).max(1)),
        size: Some(PAGE_SIZE),
    };

    // The admin token makes the backend include off-shelf products.
    let (products, categories) = tokio::join!(
        state.api().products(&product_query, Some(&admin.token)),
        state.api().categories(),
    );
    let products = products?;
    let categories = categories?;

    let carried = [
        ("keyword", keyword.clone()),
        (
            "category_id",
            category.map(|id| id.to_string()).unwrap_or_default(),
        ),
    ];

    Ok(ProductsIndexTemplate {
        layout,
        products: products.items.iter().map(ProductRowView::from).collect(),
        categories: category_options(&categories, category),
        keyword,
        pagination: Pagination::new(&products, "/products", &carried),
    })
}

/// New product form.
///
/// GET /products/new
#[instrument(skip_all)]
pub async fn new(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    layout: AdminLayout,
) -> Result<impl IntoResponse> {
    let categories = state.api().categories().await?;
    Ok(ProductFormTemplate {
        layout,
        title: "New product".to_string(),
        action: "/products".to_string(),
        form: ProductForm::blank(),
        categories: category_options(&categories, None),
        errors: ValidationErrors::new(),
    })
}

/// Create a product.
///
/// POST /products
#[instrument(skip_all, fields(admin_id = %admin.id, name = %form.name.trim()))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    layout: AdminLayout,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match form.to_input() {
        Ok(input) => input,
        Err(errors) => {
            return render_invalid(&state, layout, "New product", "/products", form, errors).await;
        }
    };

    let created = state.api().create_product(&admin.token, &input).await;
    match flash::outcome(&session, created, "Product created").await? {
        Some(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            Ok(Redirect::to("/products").into_response())
        }
        None => Ok(Redirect::to("/products/new").into_response()),
    }
}

/// Edit product form.
///
/// GET /products/{id}/edit
#[instrument(skip_all, fields(product_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    layout: AdminLayout,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let (product, categories) = tokio::join!(state.api().product(id), state.api().categories());
    let product = product?;
    let categories = categories?;

    Ok(ProductFormTemplate {
        layout,
        title: format!("Edit {}", product.name),
        action: format!("/products/{id}"),
        form: ProductForm::from(&product),
        categories: category_options(&categories, product.category_id),
        errors: ValidationErrors::new(),
    })
}

/// Update a product.
///
/// POST /products/{id}
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    layout: AdminLayout,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let input = match form.to_input() {
        Ok(input) => input,
        Err(errors) => {
            let action = format!("/products/{id}");
            return render_invalid(&state, layout, "Edit product", &action, form, errors).await;
        }
    };

    let updated = state.api().update_product(&admin.token, id, &input).await;
    match flash::outcome(&session, updated, "Product saved").await? {
        Some(()) => Ok(Redirect::to("/products").into_response()),
        None => Ok(Redirect::to(&format!("/products/{id}/edit")).into_response()),
    }
}

/// Current status, posted by the toggle button.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: ProductStatus,
}

/// Put a product on sale or take it off the shelf.
///
/// POST /products/{id}/status
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn toggle_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let target = form.status.toggled();
    let result = state.api().set_product_status(&admin.token, id, target).await;
    let message = format!("Product is now {}", target.label().to_lowercase());
    flash::outcome(&session, result, &message).await?;
    Ok(Redirect::to("/products"))
}

/// Delete a product.
///
/// POST /products/{id}/delete
#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let result = state.api().delete_product(&admin.token, id).await;
    flash::outcome(&session, result, "Product deleted").await?;
    Ok(Redirect::to("/products"))
}

async fn render_invalid(
    state: &AppState,
    layout: AdminLayout,
    title: &str,
    action: &str,
    form: ProductForm,
    errors: ValidationErrors,
) -> Result<Response> {
    let categories = state.api().categories().await?;
    let selected = form.category();
    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        ProductFormTemplate {
            layout,
            title: title.to_string(),
            action: action.to_string(),
            form,
            categories: category_options(&categories, selected),
            errors,
        },
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: " Sea Salt Chips ".to_string(),
            price: "3.50".to_string(),
            stock: "12".to_string(),
            category_id: "2".to_string(),
            on_sale: Some("on".to_string()),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_form_parses_into_input() {
        let input = form().to_input().unwrap();
        assert_eq!(input.name, "Sea Salt Chips");
        assert_eq!(input.price, Decimal::new(350, 2));
        assert_eq!(input.stock, 12);
        assert_eq!(input.category_id, Some(CategoryId::new(2)));
        assert_eq!(input.status, ProductStatus::OnSale);
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_unchecked_box_means_off_shelf() {
        let input = ProductForm {
            on_sale: None,
            ..form()
        }
        .to_input()
        .unwrap();
        assert_eq!(input.status, ProductStatus::OffSale);
    }

    #[test]
    fn test_bad_numbers_are_reported_first() {
        let errors = ProductForm {
            name: String::new(),
            price: "cheap".to_string(),
            stock: "-1.5".to_string(),
            ..form()
        }
        .to_input()
        .unwrap_err();
        assert_eq!(errors.message_for("price"), Some("Enter a price such as 3.50"));
        assert_eq!(errors.message_for("stock"), Some("Stock must be a whole number"));
        assert_eq!(errors.message_for("name"), Some("Name is required"));
    }

    #[test]
    fn test_edit_form_round_trips_product() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 4,
            "name": "Gummy Bears",
            "price": 2.25,
            "stock": 40,
            "status": "OFF_SALE"
        }))
        .unwrap();
        let form = ProductForm::from(&product);
        assert_eq!(form.price, "2.25");
        assert!(form.on_sale.is_none());
        assert_eq!(form.to_input().unwrap(), ProductInput::from(&product));
    }

    #[test]
    fn test_row_toggle_label() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 4,
            "name": "Gummy Bears",
            "price": 2.25,
            "status": "ON_SALE"
        }))
        .unwrap();
        let row = ProductRowView::from(&product);
        assert!(row.on_sale);
        assert_eq!(row.toggle_label, "Take off shelf");
    }
}
