//! Pagination links for paged backend listings.

use snackshop_core::models::Page;

/// Pagination state rendered under a table.
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Current page (1-based).
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    /// Path plus any filter query, without `page`.
    base: String,
}

impl Pagination {
    /// Build from a backend page and the filters to carry along.
    ///
    /// `filters` pairs with empty values are dropped.
    #[must_use]
    pub fn new<T>(page: &Page<T>, path: &str, filters: &[(&str, String)]) -> Self {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in filters {
            if !value.is_empty() {
                query.append_pair(key, value);
            }
        }
        let query = query.finish();
        let base = if query.is_empty() {
            format!("{path}?")
        } else {
            format!("{path}?{query}&")
        };

        Self {
            page: page.page,
            total_pages: page.total_pages(),
            total: page.total,
            base,
        }
    }

    /// Whether there is more than one page.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.total_pages > 1
    }

    /// Link to the previous page, if any.
    #[must_use]
    pub fn previous_href(&self) -> Option<String> {
        (self.page > 1).then(|| self.href(self.page - 1))
    }

    /// Link to the next page, if any.
    #[must_use]
    pub fn next_href(&self) -> Option<String> {
        (self.page < self.total_pages).then(|| self.href(self.page + 1))
    }

    fn href(&self, page: u32) -> String {
        format!("{}page={page}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, total: u64) -> Page<()> {
        Page {
            items: Vec::new(),
            total,
            page: number,
            size: 10,
        }
    }

    #[test]
    fn test_links_carry_filters() {
        let pagination = Pagination::new(
            &page(2, 35),
            "/orders",
            &[("status", "PAID".to_string()), ("keyword", String::new())],
        );
        assert_eq!(pagination.total_pages, 4);
        assert_eq!(
            pagination.previous_href().as_deref(),
            Some("/orders?status=PAID&page=1")
        );
        assert_eq!(
            pagination.next_href().as_deref(),
            Some("/orders?status=PAID&page=3")
        );
    }

    #[test]
    fn test_single_page_has_no_links() {
        let pagination = Pagination::new(&page(1, 3), "/products", &[]);
        assert!(!pagination.is_paged());
        assert!(pagination.previous_href().is_none());
        assert!(pagination.next_href().is_none());
    }
}
