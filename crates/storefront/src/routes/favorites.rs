//! Saved products.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use snackshop_core::ProductId;
use snackshop_core::models::Favorite;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::flash;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Favorite card data.
#[derive(Clone)]
pub struct FavoriteView {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub price: String,
    pub saved_on: Option<String>,
}

impl From<&Favorite> for FavoriteView {
    fn from(favorite: &Favorite) -> Self {
        Self {
            product_id: favorite.product_id,
            name: favorite.product_name.clone(),
            image_url: favorite.product_image.clone(),
            price: favorite.display_price(),
            saved_on: favorite
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/index.html")]
pub struct FavoritesTemplate {
    pub layout: Layout,
    pub favorites: Vec<FavoriteView>,
}

/// Favorite toggle form data.
#[derive(Debug, Default, Deserialize)]
pub struct FavoriteForm {
    /// Where to go afterwards; only local paths are honored.
    pub return_to: Option<String>,
}

impl FavoriteForm {
    fn back(&self, product_id: ProductId) -> Redirect {
        let fallback = format!("/products/{product_id}");
        let target = self
            .return_to
            .as_deref()
            .filter(|p| p.starts_with('/') && !p.starts_with("//"))
            .unwrap_or(&fallback);
        Redirect::to(target)
    }
}

/// List saved products.
#[instrument(skip(state, user, layout), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let favorites = state.api().favorites(&user.token).await?;
    Ok(FavoritesTemplate {
        layout,
        favorites: favorites.iter().map(FavoriteView::from).collect(),
    })
}

/// Save a product.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    Form(form): Form<FavoriteForm>,
) -> Result<Redirect> {
    let result = state.api().add_favorite(&user.token, product_id).await;
    flash::outcome(&session, result, "Saved to favorites").await?;
    Ok(form.back(product_id))
}

/// Forget a saved product.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    Form(form): Form<FavoriteForm>,
) -> Result<Redirect> {
    let result = state.api().remove_favorite(&user.token, product_id).await;
    flash::outcome(&session, result, "Removed from favorites").await?;
    Ok(form.back(product_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(form: &FavoriteForm) -> String {
        form.back(ProductId::new(5))
            .into_response()
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_back_prefers_local_return_path() {
        let mut form = FavoriteForm {
            return_to: Some("/favorites".to_string()),
        };
        assert_eq!(location(&form), "/favorites");

        form.return_to = Some("//evil.example".to_string());
        assert_eq!(location(&form), "/products/5");

        form.return_to = None;
        assert_eq!(location(&form), "/products/5");
    }
}
