//! Sales domain module.
//!
//! Sale history snapshots, the billing cart that becomes a sale request, and
//! the ephemeral price quote. Stock is never decremented here; the backend
//! owns it and the dashboard re-fetches after every sale.

pub mod cart;
pub mod quote;
pub mod sale;

pub use cart::{BillingCart, CartError, CartLine, SaleItemRequest, SaleRequest};
pub use quote::{Quote, QuoteError, QuoteLine};
pub use sale::{PaymentMethod, Sale, SaleLine};
