use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use papeleria_core::{ClientId, Money, PaymentMethodId, ProductId};
use papeleria_parties::Client;
use papeleria_products::{InventoryStats, Page, Product};
use papeleria_sales::{BillingCart, CartError, PaymentMethod, QuoteLine};

use crate::context::SessionContext;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn needle(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Payment against a debtor picked in the URL.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
}

/// Payment where the debtor selection may still be empty.
#[derive(Debug, Deserialize)]
pub struct SelectedPaymentRequest {
    #[serde(default)]
    pub client_id: Option<ClientId>,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SaleItemBody {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
    #[serde(default)]
    pub items: Vec<SaleItemBody>,
}

impl CreateSaleRequest {
    /// Rejects an incomplete sale before any product lookup, in the order the
    /// billing screen reports it: client, payment method, then items.
    pub fn precheck(&self) -> Result<(), CartError> {
        if self.items.is_empty() || self.client_id.is_none() || self.payment_method_id.is_none() {
            BillingCart::new().checkout(self.client_id, self.payment_method_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct QuoteItemBody {
    pub product_id: ProductId,
    #[serde(default = "one")]
    pub qty: i64,
}

fn one() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub items: Vec<QuoteItemBody>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub name: String,
    pub role: String,
    pub role_label: &'static str,
}

impl From<&SessionContext> for SessionView {
    fn from(session: &SessionContext) -> Self {
        Self {
            name: session.name().to_string(),
            role: session.role().as_str().to_string(),
            role_label: session.role().label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub page: Page<Product>,
    pub stats: InventoryStats,
}

#[derive(Debug, Serialize)]
pub struct SalesCatalog {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Serialize)]
pub struct PricingCatalog {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
}

#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub client: Option<String>,
    pub lines: Vec<QuoteLine>,
    pub total: Money,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SaleReceipt {
    pub total: Money,
    pub items: usize,
    /// Catalog re-fetched after the sale; stock is never decremented locally.
    pub products: Vec<Product>,
}
