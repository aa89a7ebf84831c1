//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use snackshop_core::models::{Product, Review, average_rating};
use snackshop_core::ProductId;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::layout::Layout;
use crate::state::AppState;

/// Product card data for grids.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub purchasable: bool,
    pub sales: i32,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.display_price(),
            image_url: product.image_url.clone(),
            category: product.category_name.clone(),
            purchasable: product.purchasable(),
            sales: product.sales,
        }
    }
}

/// Product detail data.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock: i32,
    pub purchasable: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.display_price(),
            image_url: product.image_url.clone(),
            category: product.category_name.clone(),
            stock: product.stock,
            purchasable: product.purchasable(),
        }
    }
}

/// Review display data.
#[derive(Clone)]
pub struct ReviewView {
    pub username: String,
    pub stars: String,
    pub content: String,
    pub date: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            username: review
                .username
                .clone()
                .unwrap_or_else(|| "Anonymous".to_string()),
            stars: review.stars(),
            content: review.content.clone(),
            date: review.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub reviews: Vec<ReviewView>,
    pub average_rating: Option<String>,
    pub is_favorite: bool,
}

/// Display product detail page.
#[instrument(skip(state, layout))]
pub async fn show(
    State(state): State<AppState>,
    layout: Layout,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let api = state.api();
    let (product, reviews) = tokio::join!(api.product(id), api.product_reviews(id));
    let product = product?;
    let reviews = reviews.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load reviews");
        Vec::new()
    });

    // A stale token only costs the heart icon here; checkout and account
    // pages handle expiry.
    let is_favorite = match &layout.user {
        Some(user) => api.is_favorite(&user.token, id).await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Favorite check failed");
            false
        }),
        None => false,
    };

    Ok(ProductShowTemplate {
        average_rating: average_rating(&reviews).map(|r| format!("{r:.1}")),
        product: ProductView::from(&product),
        reviews: reviews.iter().map(ReviewView::from).collect(),
        is_favorite,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use snackshop_core::ProductStatus;

    #[test]
    fn test_card_view_formats_price() {
        let product = Product {
            id: ProductId::new(4),
            name: "Wasabi Peas".to_string(),
            description: None,
            price: Decimal::new(450, 2),
            stock: 3,
            image_url: None,
            category_id: None,
            category_name: Some("Savory".to_string()),
            status: ProductStatus::OnSale,
            sales: 12,
        };
        let card = ProductCardView::from(&product);
        assert_eq!(card.price, "$4.50");
        assert!(card.purchasable);
        assert_eq!(ProductView::from(&product).description, "");
    }
}
