//! Parties domain module (store clients and their credit profiles).
//!
//! Clients and credit balances are owned by the backend; this crate only
//! models the snapshots the dashboard reads and the form it submits.

pub mod client;
pub mod form;

pub use client::{Client, ContactInfo, CreditProfile};
pub use form::{NewClientForm, NewClientPayload};
