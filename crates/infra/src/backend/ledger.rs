use papeleria_accounting::CreditLedger;
use papeleria_core::{ClientId, Money};
use papeleria_parties::Client;

use super::{BackendClient, BackendError};

/// Credit balances read from `GET /clients` (precomputed `creditProfile`).
#[derive(Debug, Clone)]
pub struct BackendLedger {
    backend: BackendClient,
    token: String,
}

impl BackendLedger {
    pub fn new(backend: BackendClient, token: impl Into<String>) -> Self {
        Self {
            backend,
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl CreditLedger for BackendLedger {
    type Error = BackendError;

    async fn fetch_clients(&self) -> Result<Vec<Client>, BackendError> {
        self.backend.authorized(&self.token).clients().await
    }

    async fn apply_payment(&self, client: ClientId, amount: Money) -> Result<(), BackendError> {
        self.backend.authorized(&self.token).apply_payment(client, amount).await
    }
}
