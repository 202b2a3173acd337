//! `papeleria-core`: shared building blocks for the store dashboard.
//!
//! This crate contains **pure** primitives (no IO): identifiers handed out by
//! the upstream backend, money, the domain error model and form validation.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod validation;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ClientId, CurrencyId, PaymentMethodId, ProductId, SaleId, UserId};
pub use money::Money;
pub use validation::{FieldError, ValidationErrors, Validator};
pub use value_object::ValueObject;
