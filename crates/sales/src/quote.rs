//! Ephemeral price quote for printing. Never sent to the backend.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use papeleria_core::{Money, ProductId};
use papeleria_products::Product;

pub const QUOTE_DISCLAIMER: &str = "Válido por 72 horas. Precios sujetos a cambios según tasa oficial.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("La cantidad debe ser mayor a cero: {0}")]
    InvalidQuantity(String),

    #[error("Cantidad fuera de rango: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub qty: i64,
}

impl QuoteLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.qty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub client: Option<String>,
    lines: Vec<QuoteLine>,
}

impl Quote {
    pub fn new(client: Option<String>) -> Self {
        Self {
            client,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[QuoteLine] {
        &self.lines
    }

    /// Adding a product already quoted bumps its quantity by one.
    pub fn add(&mut self, product: &Product) -> Result<(), QuoteError> {
        self.add_qty(product, 1)
    }

    /// Quantities and the quote total are checked so the total always stays
    /// representable.
    pub fn add_qty(&mut self, product: &Product, qty: i64) -> Result<(), QuoteError> {
        if qty <= 0 {
            return Err(QuoteError::InvalidQuantity(product.name.clone()));
        }
        let out_of_range = || QuoteError::OutOfRange(product.name.clone());
        let existing = self.lines.iter().position(|l| l.product_id == product.id);
        let (unit_price, qty) = match existing {
            Some(i) => (self.lines[i].unit_price, self.lines[i].qty.checked_add(qty).ok_or_else(out_of_range)?),
            None => (product.price, qty),
        };

        self.lines
            .iter()
            .filter(|l| l.product_id != product.id)
            .map(|l| l.unit_price.checked_times(l.qty))
            .chain(std::iter::once(unit_price.checked_times(qty)))
            .try_fold(Money::ZERO, |acc, subtotal| acc.checked_add(subtotal?))
            .ok_or_else(out_of_range)?;

        match existing {
            Some(i) => self.lines[i].qty = qty,
            None => self.lines.push(QuoteLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price,
                qty,
            }),
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(QuoteLine::subtotal).sum()
    }

    /// Plain-text rendering for the print view.
    pub fn render_text(&self, issued_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Papelería C.A.");
        let _ = writeln!(out, "PRESUPUESTO");
        let _ = writeln!(out, "Fecha de Emisión: {}", issued_at.format("%d/%m/%Y %H:%M"));
        let _ = writeln!(out, "Cliente: {}", self.client.as_deref().unwrap_or("Cliente General"));
        let _ = writeln!(out, "Vigencia: {QUOTE_DISCLAIMER}");
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>5}  {:<32} {:>16} {:>16}", "Cant", "Descripción", "Unitario", "Subtotal");
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{:>5}  {:<32} {:>16} {:>16}",
                line.qty,
                line.name,
                line.unit_price.format_bs(),
                line.subtotal().format_bs()
            );
        }
        let _ = writeln!(out);
        let _ = write!(out, "Total Presupuestado: {}", self.total().format_bs());
        out
    }
}
