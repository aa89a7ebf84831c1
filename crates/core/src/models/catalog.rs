//! Products, categories and paged listings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId, ProductStatus};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Payload for creating or renaming a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sort_order: i32,
}

/// A snack in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub sales: i32,
}

impl Product {
    /// Price for display.
    #[must_use]
    pub fn display_price(&self) -> String {
        Price::of(self.price).display()
    }

    /// Whether the product can be put in a cart right now.
    ///
    /// Stock is not consulted: 0 means the backend did not say, and the
    /// backend has the final word at checkout.
    #[must_use]
    pub fn purchasable(&self) -> bool {
        self.status == ProductStatus::OnSale
    }
}

/// Payload for creating or editing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub status: ProductStatus,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            image_url: product.image_url.clone(),
            category_id: product.category_id,
            status: product.status,
        }
    }
}

/// Filters for the product listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl ProductQuery {
    /// Query parameters with blank keywords dropped.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(keyword) = self.keyword.as_deref().map(str::trim)
            && !keyword.is_empty()
        {
            params.push(("keyword", keyword.to_string()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("categoryId", category_id.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.max(1).to_string()));
        }
        if let Some(size) = self.size {
            params.push(("size", size.to_string()));
        }
        params
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Number of pages, never less than one.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_with_optional_fields_missing() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Sea Salt Chips",
            "price": 3.5
        }))
        .unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.status, ProductStatus::OnSale);
        assert_eq!(product.display_price(), "$3.50");
        assert_eq!(product.stock, 0);
        assert!(product.purchasable());
    }

    #[test]
    fn test_query_params_skip_blank_keyword() {
        let query = ProductQuery {
            keyword: Some("   ".to_string()),
            category_id: Some(CategoryId::new(2)),
            page: Some(0),
            size: None,
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("categoryId", "2".to_string()),
                ("page", "1".to_string())
            ]
        );
    }

    #[test]
    fn test_page_math() {
        let page = Page::<u8> {
            items: vec![],
            total: 41,
            page: 2,
            size: 20,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let empty = Page::<u8> {
            items: vec![],
            total: 0,
            page: 1,
            size: 20,
        };
        assert_eq!(empty.total_pages(), 1);
        assert!(!empty.has_next());
    }
}
