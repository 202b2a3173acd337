use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use papeleria_accounting::{CurrencyCode, ExchangeBoard, NewRateForm};
use papeleria_auth::Permission;
use papeleria_infra::{AuthorizedClient, BackendError};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new().route("/:code", get(board).post(record_rate))
}

/// History is only fetched once a latest rate exists.
async fn load_board(upstream: AuthorizedClient<'_>, code: CurrencyCode) -> Result<ExchangeBoard, BackendError> {
    let latest = upstream.latest_rate(code).await?;
    let history = match &latest {
        Some(rate) => {
            let currency = rate.currency.as_ref().map_or(code.fallback().id, |c| c.id);
            upstream.rate_history(currency).await?
        }
        None => Vec::new(),
    };
    Ok(ExchangeBoard::assemble(code, latest, history))
}

pub async fn board(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(code): Path<String>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::EXCHANGE) {
        return errors::forbidden(e);
    }
    let code: CurrencyCode = match code.parse() {
        Ok(code) => code,
        Err(e) => return errors::domain_error(e),
    };

    match load_board(services.upstream(&session), code).await {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

pub async fn record_rate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(code): Path<String>,
    Json(form): Json<NewRateForm>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::EXCHANGE) {
        return errors::forbidden(e);
    }
    let code: CurrencyCode = match code.parse() {
        Ok(code) => code,
        Err(e) => return errors::domain_error(e),
    };

    let upstream = services.upstream(&session);
    let current = match load_board(upstream, code).await {
        Ok(board) => board,
        Err(e) => return errors::backend_error(e),
    };
    let payload = match form.into_payload(current.currency.id) {
        Ok(payload) => payload,
        Err(e) => return errors::validation_error(e),
    };
    if let Err(e) = upstream.create_rate(&payload).await {
        return errors::backend_error(e);
    }
    tracing::info!(currency = %code, rate = %payload.rate_value, "exchange rate recorded");

    match load_board(upstream, code).await {
        Ok(board) => (StatusCode::CREATED, Json(board)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}
