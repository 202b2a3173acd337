//! Upstream REST backend adapters.

pub mod client;
pub mod envelope;
pub mod ledger;
pub mod wire;

pub use client::{AuthorizedClient, BackendClient, BackendError};
pub use ledger::BackendLedger;
