//! Products domain module.
//!
//! Product snapshots, the product form, inventory statistics and catalog
//! filtering. Pure logic only (no IO, no HTTP); stock is owned by the backend.

pub mod catalog;
pub mod form;
pub mod product;
pub mod stats;

pub use catalog::{CatalogQuery, Page};
pub use form::{ProductForm, ProductPayload};
pub use product::{Category, Product};
pub use stats::InventoryStats;
