use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use papeleria_core::{ClientId, Entity, Money, PaymentMethodId, ProductId, SaleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
}

impl SaleLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Immutable record of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub client_id: Option<ClientId>,
    pub client_name: Option<String>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub payment_method: Option<String>,
    pub total: Money,
    pub items: Vec<SaleLine>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Sort newest first; undated sales go last, ties by descending id.
    pub fn sort_newest_first(sales: &mut [Sale]) {
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
