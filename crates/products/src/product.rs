use serde::{Deserialize, Serialize};

use papeleria_core::{CategoryId, Entity, Money, ProductId};

/// Product category as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Case-insensitive lookup by display name.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let wanted = name.trim().to_lowercase();
        categories.iter().find(|c| c.name.trim().to_lowercase() == wanted)
    }
}

/// Read snapshot of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub stock: i64,
    pub min_stock: i64,
    pub price: Money,
    pub sku: Option<String>,
}

impl Product {
    /// At or below its own reorder point.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    pub fn stock_value(&self) -> Money {
        self.price.times(self.stock)
    }

    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// Case-insensitive substring match on name, brand and SKU.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [Some(&self.name), self.brand.as_ref(), self.sku.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
pub(crate) fn sample(id: i64, name: &str, stock: i64, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        brand: None,
        category: Some("Cuadernos".to_string()),
        stock,
        min_stock: 5,
        price: Money::from(price),
        sku: None,
    }
}
