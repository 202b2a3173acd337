//! Exchange-rate history per currency.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use papeleria_core::{CurrencyId, DomainError, ValidationErrors, Validator};

/// Currencies the store quotes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Bolivares,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 3] = [CurrencyCode::Usd, CurrencyCode::Eur, CurrencyCode::Bolivares];

    pub fn as_str(self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Bolivares => "BOLIVARES",
        }
    }

    /// Known id and symbol, used when the backend has no rate recorded yet.
    pub fn fallback(self) -> Currency {
        let (id, symbol) = match self {
            CurrencyCode::Usd => (1, "$"),
            CurrencyCode::Eur => (2, "€"),
            CurrencyCode::Bolivares => (3, "Bs"),
        };
        Currency {
            id: CurrencyId::new(id),
            code: self.as_str().to_string(),
            symbol: Some(symbol.to_string()),
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CurrencyCode::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::invalid_id(format!("moneda desconocida: {wanted}")))
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub code: String,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub id: i64,
    pub rate_value: Decimal,
    pub currency: Option<Currency>,
    pub created_at: Option<DateTime<Utc>>,
    /// Name of the user who recorded the rate.
    pub recorded_by: Option<String>,
}

/// Movement of a rate relative to the record before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Unchanged,
    /// Oldest record; nothing to compare against.
    Initial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateEntry {
    #[serde(flatten)]
    pub rate: ExchangeRate,
    pub trend: Trend,
}

/// Annotate a newest-first history, comparing each record to the next (older) one.
pub fn annotate_history(history: Vec<ExchangeRate>) -> Vec<RateEntry> {
    let older: Vec<Option<Decimal>> = history
        .iter()
        .skip(1)
        .map(|r| Some(r.rate_value))
        .chain(std::iter::once(None))
        .collect();

    history
        .into_iter()
        .zip(older)
        .map(|(rate, previous)| {
            let trend = match previous {
                None => Trend::Initial,
                Some(prev) if rate.rate_value > prev => Trend::Up,
                Some(prev) if rate.rate_value < prev => Trend::Down,
                Some(_) => Trend::Unchanged,
            };
            RateEntry { rate, trend }
        })
        .collect()
}

/// Everything the exchange-rate screen shows for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeBoard {
    pub currency: Currency,
    pub latest: Option<ExchangeRate>,
    pub history: Vec<RateEntry>,
}

impl ExchangeBoard {
    /// Without a latest rate the board falls back to the known currency and an empty history.
    pub fn assemble(code: CurrencyCode, latest: Option<ExchangeRate>, history: Vec<ExchangeRate>) -> Self {
        match latest {
            Some(latest) => Self {
                currency: latest.currency.clone().unwrap_or_else(|| code.fallback()),
                latest: Some(latest),
                history: annotate_history(history),
            },
            None => Self {
                currency: code.fallback(),
                latest: None,
                history: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewRateForm {
    pub rate_value: Decimal,
}

/// Body of `POST /exchange-rates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRatePayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_value: Decimal,
    pub currency_id: CurrencyId,
}

impl NewRateForm {
    pub fn into_payload(self, currency: CurrencyId) -> Result<NewRatePayload, ValidationErrors> {
        Validator::new()
            .check(self.rate_value > Decimal::ZERO, "rate_value", "La tasa debe ser mayor a 0")
            .finish()?;
        Ok(NewRatePayload {
            rate_value: self.rate_value,
            currency_id: currency,
        })
    }
}
