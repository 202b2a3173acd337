//! Infrastructure layer: the gateway to the upstream REST backend.
//!
//! Every backend response passes through [`backend::wire`] exactly once; the
//! rest of the workspace only sees typed domain snapshots.

pub mod backend;

pub use backend::{AuthorizedClient, BackendClient, BackendError, BackendLedger};
