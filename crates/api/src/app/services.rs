//! Shared, immutable request-time dependencies.

use std::sync::Arc;

use papeleria_auth::Hs256SessionCodec;
use papeleria_infra::{AuthorizedClient, BackendClient, BackendLedger};

use crate::config::ApiConfig;
use crate::context::SessionContext;

#[derive(Debug)]
pub struct AppServices {
    pub backend: BackendClient,
    pub sessions: Arc<Hs256SessionCodec>,
    pub config: ApiConfig,
}

impl AppServices {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            backend: BackendClient::new(&config.backend_url),
            sessions: Arc::new(Hs256SessionCodec::new(config.auth_secret.as_bytes(), config.session_max_age)),
            config,
        }
    }

    /// Backend handle carrying the caller's upstream token.
    pub fn upstream<'a>(&'a self, session: &'a SessionContext) -> AuthorizedClient<'a> {
        self.backend.authorized(session.access_token())
    }

    pub fn ledger(&self, session: &SessionContext) -> BackendLedger {
        BackendLedger::new(self.backend.clone(), session.access_token())
    }
}
