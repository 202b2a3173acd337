//! Product create/edit form and its wire payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use papeleria_core::{CategoryId, Money, ValidationErrors, Validator};

use crate::product::Category;

fn default_min_stock() -> i64 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    /// Category display name; resolved against the backend's categories.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_min_stock")]
    pub min_stock: i64,
    #[serde(default)]
    pub price: Decimal,
}

/// Body the backend expects on `POST /products` and `PATCH /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    #[serde(serialize_with = "papeleria_core::money::serialize_as_number")]
    pub price: Money,
    pub stock: i64,
    pub min_stock: i64,
    pub category_id: CategoryId,
}

impl ProductForm {
    /// Validate and resolve the category, producing the wire payload.
    pub fn into_payload(self, categories: &[Category]) -> Result<ProductPayload, ValidationErrors> {
        let category = Category::find_by_name(categories, &self.category);

        Validator::new()
            .min_chars("name", self.name.trim(), 3, "El nombre debe tener al menos 3 caracteres")
            .required("category", &self.category, "La categoría es requerida")
            .check(category.is_some(), "category", "Categoría no encontrada")
            .check(self.price > Decimal::ZERO, "price", "El precio debe ser mayor a 0")
            .check(self.stock >= 0, "stock", "El stock no puede ser negativo")
            .check(self.min_stock >= 0, "min_stock", "El stock mínimo no puede ser negativo")
            .finish()?;

        let category_id = match category {
            Some(c) => c.id,
            None => return Err(ValidationErrors::single("category", "Categoría no encontrada")),
        };

        Ok(ProductPayload {
            name: self.name.trim().to_string(),
            price: Money::new(self.price),
            stock: self.stock,
            min_stock: self.min_stock,
            category_id,
        })
    }
}
