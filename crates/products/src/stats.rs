use serde::Serialize;

use papeleria_core::Money;

use crate::product::Product;

/// Header figures of the inventory view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total_products: usize,
    /// Products with `stock <= threshold`.
    pub low_stock_count: usize,
    /// Σ stock × price.
    pub total_value: Money,
    pub category_count: usize,
}

impl InventoryStats {
    pub fn compute(products: &[Product], threshold: i64) -> Self {
        let mut categories: Vec<&str> = products
            .iter()
            .filter_map(|p| p.category.as_deref())
            .collect();
        categories.sort_unstable();
        categories.dedup();

        Self {
            total_products: products.len(),
            low_stock_count: products.iter().filter(|p| p.stock <= threshold).count(),
            total_value: products.iter().map(Product::stock_value).sum(),
            category_count: categories.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::sample;
    use proptest::prelude::*;

    #[test]
    fn two_product_scenario() {
        let products = vec![sample(1, "Lápiz", 2, 10), sample(2, "Borrador", 20, 5)];
        let stats = InventoryStats::compute(&products, 3);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.total_value, Money::from(120));
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.category_count, 1);
    }

    #[test]
    fn empty_inventory() {
        let stats = InventoryStats::compute(&[], 3);
        assert_eq!(stats.total_value, Money::ZERO);
        assert_eq!(stats.low_stock_count, 0);
    }

    proptest! {
        #[test]
        fn value_and_low_stock_match_definitions(
            rows in prop::collection::vec((0i64..500, 0i64..10_000), 0..40),
            threshold in 0i64..10,
        ) {
            let products: Vec<_> = rows
                .iter()
                .enumerate()
                .map(|(i, (stock, price))| sample(i as i64, "p", *stock, *price))
                .collect();
            let stats = InventoryStats::compute(&products, threshold);

            let expected_value: i64 = rows.iter().map(|(s, p)| s * p).sum();
            let expected_low = rows.iter().filter(|(s, _)| *s <= threshold).count();
            prop_assert_eq!(stats.total_value, Money::from(expected_value));
            prop_assert_eq!(stats.low_stock_count, expected_low);
        }
    }
}
