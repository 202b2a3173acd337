use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use papeleria_core::{ClientId, Entity, Money};

/// Contact information for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Backend-owned credit record of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditProfile {
    pub credit_limit: Money,
    pub current_debt: Money,
    pub is_active: bool,
}

impl CreditProfile {
    /// Balances at or below this are treated as paid off.
    pub const PAID_OFF_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

    pub fn has_outstanding_debt(&self) -> bool {
        self.is_active && self.current_debt.amount() > Self::PAID_OFF_EPSILON
    }
}

/// Read snapshot of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub tax_id: Option<String>,
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub credit_profile: Option<CreditProfile>,
}

impl Client {
    /// Case-insensitive substring match on name and tax id. A blank needle matches.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self
                .tax_id
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
    }

    pub fn current_debt(&self) -> Money {
        self.credit_profile
            .as_ref()
            .map_or(Money::ZERO, |p| p.current_debt)
    }

    pub fn is_debtor(&self) -> bool {
        self.credit_profile
            .as_ref()
            .is_some_and(CreditProfile::has_outstanding_debt)
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
