//! Search, sort, and paging of the products table.
//!
//! The backend returns the full list; the table narrows it in memory.

use std::cmp::Ordering;

use serde::Deserialize;
use shelfdesk_core::Product;

/// Query parameters of the products table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    /// Free-text search over name and description.
    pub q: Option<String>,
    /// Sort column key (`name`, `price`, `stock`).
    pub sort: Option<String>,
    /// Sort direction (`asc`/`desc`).
    pub dir: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Stock,
}

impl SortKey {
    /// Parse a column key from the query string.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "stock" => Some(Self::Stock),
            _ => None,
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Price => a.price.cmp(&b.price),
            Self::Stock => a.stock.cmp(&b.stock),
        }
    }
}

impl ListingQuery {
    /// Trimmed search text, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Recognised sort column, if any.
    #[must_use]
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_deref().and_then(SortKey::parse)
    }

    /// Whether the sort direction is descending.
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.dir.as_deref() == Some("desc")
    }
}

/// One page of the filtered, sorted product list.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Rows of this page.
    pub products: Vec<Product>,
    /// Rows matching the search, across all pages.
    pub total: usize,
    /// Current page (1-based, clamped to the available pages).
    pub page: usize,
    /// Number of pages (at least 1).
    pub page_count: usize,
}

impl ListingPage {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// Filter, sort, and slice `products` for one table page.
#[must_use]
pub fn apply(products: &[Product], query: &ListingQuery, per_page: usize) -> ListingPage {
    let per_page = per_page.max(1);

    let needle = query.search().map(str::to_lowercase);
    let mut rows: Vec<&Product> = products
        .iter()
        .filter(|p| {
            needle.as_deref().is_none_or(|n| {
                p.name.to_lowercase().contains(n) || p.description.to_lowercase().contains(n)
            })
        })
        .collect();

    if let Some(key) = query.sort_key() {
        // Stable sort keeps backend order among equal values in both directions.
        if query.is_descending() {
            rows.sort_by(|a, b| key.compare(b, a));
        } else {
            rows.sort_by(|a, b| key.compare(a, b));
        }
    }

    let total = rows.len();
    let page_count = total.div_ceil(per_page).max(1);
    let page = query.page.unwrap_or(1).clamp(1, page_count);

    let products = rows
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();

    ListingPage {
        products,
        total,
        page,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shelfdesk_core::ProductId;

    use super::*;

    fn product(id: i64, name: &str, description: &str, price: i64, stock: i64) -> Product {
        Product {
            id: ProductId::from_number(id),
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::new(price, 0),
            stock,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Mug", "Ceramic mug", 8, 40),
            product(2, "espresso beans", "Dark roast", 24, 12),
            product(3, "Teapot", "Cast iron", 35, 3),
            product(4, "Green Tea", "Loose leaf", 6, 80),
        ]
    }

    fn names(page: &ListingPage) -> Vec<&str> {
        page.products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_no_query_keeps_backend_order() {
        let page = apply(&catalog(), &ListingQuery::default(), 10);
        assert_eq!(names(&page), vec!["Mug", "espresso beans", "Teapot", "Green Tea"]);
        assert_eq!(page.total, 4);
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn test_search_matches_name_and_description_case_insensitively() {
        let query = ListingQuery {
            q: Some("  TEA ".to_string()),
            ..ListingQuery::default()
        };
        let page = apply(&catalog(), &query, 10);
        assert_eq!(names(&page), vec!["Teapot", "Green Tea"]);

        let query = ListingQuery {
            q: Some("roast".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(names(&apply(&catalog(), &query, 10)), vec!["espresso beans"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let query = ListingQuery {
            sort: Some("name".to_string()),
            ..ListingQuery::default()
        };
        let page = apply(&catalog(), &query, 10);
        assert_eq!(names(&page), vec!["espresso beans", "Green Tea", "Mug", "Teapot"]);
    }

    #[test]
    fn test_sort_by_price_descending() {
        let query = ListingQuery {
            sort: Some("price".to_string()),
            dir: Some("desc".to_string()),
            ..ListingQuery::default()
        };
        let page = apply(&catalog(), &query, 10);
        assert_eq!(names(&page), vec!["Teapot", "espresso beans", "Mug", "Green Tea"]);
    }

    #[test]
    fn test_descending_sort_keeps_backend_order_for_ties() {
        let products = vec![
            product(1, "Saucer", "Small plate", 5, 10),
            product(2, "Mug", "Ceramic mug", 8, 40),
            product(3, "Coaster", "Cork", 5, 10),
        ];
        let query = ListingQuery {
            sort: Some("stock".to_string()),
            dir: Some("desc".to_string()),
            ..ListingQuery::default()
        };
        let page = apply(&products, &query, 10);
        assert_eq!(names(&page), vec!["Mug", "Saucer", "Coaster"]);
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let query = ListingQuery {
            sort: Some("description".to_string()),
            ..ListingQuery::default()
        };
        let page = apply(&catalog(), &query, 10);
        assert_eq!(names(&page), vec!["Mug", "espresso beans", "Teapot", "Green Tea"]);
    }

    #[test]
    fn test_paging() {
        let query = ListingQuery {
            page: Some(2),
            ..ListingQuery::default()
        };
        let page = apply(&catalog(), &query, 3);
        assert_eq!(names(&page), vec!["Green Tea"]);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_count, 2);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_out_of_range_page_clamps() {
        let query = ListingQuery {
            page: Some(99),
            ..ListingQuery::default()
        };
        let page = apply(&catalog(), &query, 3);
        assert_eq!(page.page, 2);

        let query = ListingQuery {
            page: Some(0),
            ..ListingQuery::default()
        };
        assert_eq!(apply(&catalog(), &query, 3).page, 1);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let page = apply(&[], &ListingQuery::default(), 10);
        assert!(page.products.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert!(!page.has_next());
    }
}
