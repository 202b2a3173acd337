use rust_decimal::Decimal;
use serde::Serialize;

use papeleria_core::Money;
use papeleria_products::Product;
use papeleria_sales::Sale;

/// Products below this stock count toward the dashboard's critical figure.
pub const CRITICAL_STOCK_BELOW: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_revenue: Money,
    pub total_orders: usize,
    pub total_users: usize,
    pub avg_ticket: Money,
    pub low_stock_count: usize,
}

impl Kpis {
    pub fn compute(sales: &[Sale], products: &[Product], total_users: usize) -> Self {
        let total_revenue: Money = sales.iter().map(|s| s.total).sum();
        let avg_ticket = if sales.is_empty() {
            Money::ZERO
        } else {
            Money::new((total_revenue.amount() / Decimal::from(sales.len())).round_dp(2))
        };

        Self {
            total_revenue,
            total_orders: sales.len(),
            total_users,
            avg_ticket,
            low_stock_count: products.iter().filter(|p| p.stock < CRITICAL_STOCK_BELOW).count(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Utc};
    use papeleria_core::{ProductId, SaleId};

    use super::*;

    pub fn sale(id: i64, total: i64, at: Option<DateTime<Utc>>) -> Sale {
        Sale {
            id: SaleId::new(id),
            client_id: None,
            client_name: None,
            payment_method_id: None,
            payment_method: None,
            total: Money::from(total),
            items: Vec::new(),
            created_at: at,
        }
    }

    pub fn product(id: i64, name: &str, stock: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            brand: None,
            category: None,
            stock,
            min_stock: 0,
            price: Money::from(1),
            sku: None,
        }
    }
}
