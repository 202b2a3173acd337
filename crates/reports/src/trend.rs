use chrono::{Days, NaiveDate};
use serde::Serialize;

use papeleria_core::Money;
use papeleria_sales::Sale;

pub const TREND_DAYS: u64 = 7;

/// Sales of one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    /// `DD/MM` axis label.
    pub label: String,
    pub amount: Money,
    pub count: usize,
}

/// The last seven days ending at `today`, oldest first. Days without sales are zero.
pub fn seven_day_trend(sales: &[Sale], today: NaiveDate) -> Vec<DailySales> {
    (0..TREND_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let day: Vec<&Sale> = sales
                .iter()
                .filter(|s| s.created_at.is_some_and(|at| at.date_naive() == date))
                .collect();
            DailySales {
                date,
                label: date.format("%d/%m").to_string(),
                amount: day.iter().map(|s| s.total).sum(),
                count: day.len(),
            }
        })
        .collect()
}
