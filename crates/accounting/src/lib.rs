//! Accounting module: accounts receivable and exchange-rate history.
//!
//! Balances and rates are computed and stored by the backend. This crate
//! filters, sums and sequences the calls; it never adjusts a balance locally.

pub mod exchange;
pub mod receivables;

pub use exchange::{
    Currency, CurrencyCode, ExchangeBoard, ExchangeRate, NewRateForm, NewRatePayload, RateEntry,
    Trend, annotate_history,
};
pub use receivables::{
    CreditLedger, DebtorSnapshot, LedgerState, PaymentOutcome, PaymentRejection, ReceivablesError,
    ReceivablesView, list_debtors, total_exposure, validate_payment,
};
