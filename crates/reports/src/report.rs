use chrono::{DateTime, Utc};
use serde::Serialize;

use papeleria_products::Product;
use papeleria_sales::Sale;

use crate::{DailySales, InventoryBar, Kpis, insights, seven_day_trend, top_inventory};

/// Payload of the dashboard start page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardReport {
    pub kpis: Kpis,
    pub insights: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl DashboardReport {
    pub fn build(
        viewer: Option<&str>,
        sales: &[Sale],
        products: &[Product],
        total_users: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let kpis = Kpis::compute(sales, products, total_users);
        Self {
            insights: insights(viewer, &kpis),
            kpis,
            generated_at: now,
        }
    }
}

/// Payload of the reports page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub kpis: Kpis,
    pub sales_trend: Vec<DailySales>,
    pub inventory: Vec<InventoryBar>,
    pub generated_at: DateTime<Utc>,
}

impl AnalyticsReport {
    pub fn build(sales: &[Sale], products: &[Product], total_users: usize, now: DateTime<Utc>) -> Self {
        Self {
            kpis: Kpis::compute(sales, products, total_users),
            sales_trend: seven_day_trend(sales, now.date_naive()),
            inventory: top_inventory(products),
            generated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use papeleria_core::Money;

    use super::*;
    use crate::kpis::fixtures::{product, sale};

    #[test]
    fn analytics_report_ends_today() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 15, 0, 0).unwrap();
        let report = AnalyticsReport::build(&[sale(1, 40, Some(now))], &[product(1, "Tijeras", 4)], 2, now);
        assert_eq!(report.sales_trend.last().map(|d| d.amount), Some(Money::from(40)));
        assert_eq!(report.inventory.len(), 1);
        assert_eq!(report.kpis.total_users, 2);
    }

    #[test]
    fn dashboard_report_carries_insights() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 15, 0, 0).unwrap();
        let report = DashboardReport::build(Some("Luis"), &[], &[product(1, "Goma", 2)], 1, now);
        assert_eq!(report.kpis.low_stock_count, 1);
        assert!(report.insights[2].contains("1 productos"));
    }
}
