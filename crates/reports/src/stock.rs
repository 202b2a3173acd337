use serde::Serialize;

use papeleria_products::Product;

pub const TOP_INVENTORY: usize = 10;
const LABEL_CHARS: usize = 15;

/// Traffic light for a stock bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Critical,
    Warning,
    Ok,
}

impl StockLevel {
    pub fn of(stock: i64) -> Self {
        match stock {
            s if s <= 5 => StockLevel::Critical,
            s if s <= 15 => StockLevel::Warning,
            _ => StockLevel::Ok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryBar {
    pub label: String,
    pub name: String,
    pub stock: i64,
    pub level: StockLevel,
}

/// First ten products as listed by the backend.
pub fn top_inventory(products: &[Product]) -> Vec<InventoryBar> {
    products
        .iter()
        .take(TOP_INVENTORY)
        .map(|p| InventoryBar {
            label: p.name.chars().take(LABEL_CHARS).collect(),
            name: p.name.clone(),
            stock: p.stock,
            level: StockLevel::of(p.stock),
        })
        .collect()
}
