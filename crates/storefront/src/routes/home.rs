//! Home page: category filter, keyword search and the product grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use snackshop_core::CategoryId;
use snackshop_core::models::{Category, ProductQuery};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::layout::Layout;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Products per page on the home grid.
const PAGE_SIZE: u32 = 12;

/// Catalog filter query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub keyword: Option<String>,
    pub category: Option<CategoryId>,
    pub page: Option<u32>,
}

/// Category tab data.
#[derive(Clone)]
pub struct CategoryTabView {
    pub id: CategoryId,
    pub name: String,
    pub active: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryTabView>,
    pub all_active: bool,
    pub products: Vec<ProductCardView>,
    pub keyword: String,
    /// Query string for page links without `page`, ending in `&` when set.
    pub filter_query: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

fn filter_query(keyword: &str, category: Option<CategoryId>) -> String {
    let mut out = url::form_urlencoded::Serializer::new(String::new());
    if !keyword.is_empty() {
        out.append_pair("keyword", keyword);
    }
    if let Some(category) = category {
        out.append_pair("category", &category.to_string());
    }
    let mut query = out.finish();
    if !query.is_empty() {
        query.push('&');
    }
    query
}

/// Display the home page.
#[instrument(skip(state, layout))]
pub async fn home(
    State(state): State<AppState>,
    layout: Layout,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let keyword = query.keyword.unwrap_or_default().trim().to_string();
    let product_query = ProductQuery {
        keyword: Some(keyword.clone()),
        category_id: query.category,
        page: Some(query.page.unwrap_or(1).max(1)),
        size: Some(PAGE_SIZE),
    };

    let api = state.api();
    let (categories, page) = tokio::join!(api.categories(), api.products(&product_query, None));
    let page = page?;
    let categories: Vec<Category> = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });

    Ok(HomeTemplate {
        layout,
        categories: categories
            .iter()
            .map(|c| CategoryTabView {
                id: c.id,
                name: c.name.clone(),
                active: Some(c.id) == query.category,
            })
            .collect(),
        all_active: query.category.is_none(),
        products: page.items.iter().map(ProductCardView::from).collect(),
        filter_query: filter_query(&keyword, query.category),
        keyword,
        current_page: page.page,
        total_pages: page.total_pages(),
        has_previous: page.has_previous(),
        has_next: page.has_next(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_encodes_and_terminates() {
        assert_eq!(filter_query("", None), "");
        assert_eq!(
            filter_query("sour gummies", Some(CategoryId::new(2))),
            "keyword=sour+gummies&category=2&"
        );
    }
}
