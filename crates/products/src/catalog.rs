//! Client-side filtering and pagination of the product list.

use serde::{Deserialize, Serialize};

use crate::product::Product;

pub const DEFAULT_PER_PAGE: usize = 10;

/// Filters of the inventory table. Every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl CatalogQuery {
    pub fn accepts(&self, product: &Product) -> bool {
        if let Some(search) = &self.search {
            if !product.matches(search) {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            let same = product
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !same {
                return false;
            }
        }
        !self.low_stock || product.is_low_stock()
    }

    /// Filter then slice one 1-based page. Out-of-range pages are clamped.
    pub fn apply(&self, products: &[Product]) -> Page<Product> {
        let filtered: Vec<&Product> = products.iter().filter(|p| self.accepts(p)).collect();
        let per_page = self.per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PER_PAGE);
        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(per_page).max(1);
        let page = self.page.unwrap_or(1).clamp(1, total_pages);

        let items = filtered
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Page {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::sample;

    fn inventory(n: i64) -> Vec<Product> {
        (1..=n).map(|i| sample(i, &format!("Producto {i}"), i, 1)).collect()
    }

    #[test]
    fn paginates_ten_per_page() {
        let page = CatalogQuery { page: Some(3), ..Default::default() }.apply(&inventory(23));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].id.get(), 21);
    }

    #[test]
    fn empty_list_reports_one_page() {
        let page = CatalogQuery::default().apply(&[]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn clamps_page_past_the_end() {
        let page = CatalogQuery { page: Some(99), ..Default::default() }.apply(&inventory(12));
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn combines_filters() {
        let mut products = inventory(8);
        products[1].category = Some("Arte".to_string());
        products[6].category = Some("Arte".to_string());
        let query = CatalogQuery {
            category: Some("arte".to_string()),
            low_stock: true,
            ..Default::default()
        };
        let page = query.apply(&products);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.get(), 2);
    }
}
