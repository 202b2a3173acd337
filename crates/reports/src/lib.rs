//! Dashboard and report read models.
//!
//! Everything here is recomputed from fresh backend snapshots on every poll;
//! nothing is cached between refreshes.

pub mod insights;
pub mod kpis;
pub mod report;
pub mod stock;
pub mod trend;

pub use insights::insights;
pub use kpis::Kpis;
pub use report::{AnalyticsReport, DashboardReport};
pub use stock::{InventoryBar, StockLevel, top_inventory};
pub use trend::{DailySales, seven_day_trend};
