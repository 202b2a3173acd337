//! Billing cart and the sale request it produces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use papeleria_core::{ClientId, CurrencyId, Money, PaymentMethodId, ProductId};
use papeleria_products::Product;

/// Sales are always billed in the store's base currency.
pub const BILLING_CURRENCY: CurrencyId = CurrencyId::new(1);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Stock Insuficiente: {product} (disponible: {available})")]
    InsufficientStock { product: String, available: i64 },

    #[error("producto no encontrado: {0}")]
    UnknownProduct(ProductId),

    #[error("La cantidad debe ser mayor a cero: {0}")]
    InvalidQuantity(String),

    #[error("El total de la venta excede el monto permitido")]
    TotalOutOfRange,

    #[error("Seleccione un cliente")]
    MissingClient,

    #[error("Seleccione un método de pago")]
    MissingPaymentMethod,

    #[error("El carrito está vacío")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    /// Stock at the time the product was added.
    pub available: i64,
    pub quantity: i64,
}

impl CartLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Body of `POST /sales`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub client_id: ClientId,
    pub payment_method_id: PaymentMethodId,
    pub currency_id: CurrencyId,
    pub items: Vec<SaleItemRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillingCart {
    lines: Vec<CartLine>,
}

impl BillingCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// The merged quantity must fit in the product's stock and the cart total
    /// must stay representable.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(product.name.clone()));
        }
        let already = self
            .lines
            .iter()
            .find(|l| l.product_id == product.id)
            .map_or(0, |l| l.quantity);
        let wanted = already
            .checked_add(quantity)
            .filter(|&wanted| product.can_supply(wanted))
            .ok_or_else(|| CartError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
            })?;
        self.ensure_total_fits(product.id, product.price, wanted)?;

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = wanted,
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                available: product.stock,
                quantity: wanted,
            }),
        }
        Ok(())
    }

    /// Total with `product_id` priced at `quantity` units, if it fits.
    fn ensure_total_fits(&self, product_id: ProductId, unit_price: Money, quantity: i64) -> Result<(), CartError> {
        let others = self.lines.iter().filter(|l| l.product_id != product_id);
        others
            .map(|l| l.unit_price.checked_times(l.quantity))
            .chain(std::iter::once(unit_price.checked_times(quantity)))
            .try_fold(Money::ZERO, |acc, subtotal| acc.checked_add(subtotal?))
            .map(|_| ())
            .ok_or(CartError::TotalOutOfRange)
    }

    /// Build the sale request. Fails closed when anything is missing.
    pub fn checkout(
        &self,
        client: Option<ClientId>,
        payment_method: Option<PaymentMethodId>,
    ) -> Result<SaleRequest, CartError> {
        let client_id = client.ok_or(CartError::MissingClient)?;
        let payment_method_id = payment_method.ok_or(CartError::MissingPaymentMethod)?;
        if self.lines.is_empty() {
            return Err(CartError::Empty);
        }

        Ok(SaleRequest {
            client_id,
            payment_method_id,
            currency_id: BILLING_CURRENCY,
            items: self
                .lines
                .iter()
                .map(|l| SaleItemRequest {
                    product_id: l.product_id,
                    quantity: l.quantity,
                })
                .collect(),
        })
    }
}
