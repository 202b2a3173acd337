//! Accounts receivable: debtors of the store and their payments.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;

use papeleria_accounting::{PaymentOutcome, ReceivablesView};
use papeleria_auth::Permission;
use papeleria_core::ClientId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/debtors", get(list_debtors))
        .route("/debtors/:id/payments", post(pay_debtor))
        .route("/payments", post(pay_selected))
}

/// Debtors matching `?search=`. Count and exposure always cover every debtor.
pub async fn list_debtors(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<dto::SearchQuery>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::ACCOUNTS) {
        return errors::forbidden(e);
    }

    let mut view = ReceivablesView::new(services.ledger(&session));
    if let Err(e) = view.load().await {
        return errors::backend_error(e);
    }
    let snapshot = view.into_snapshot().searched(query.needle());
    (StatusCode::OK, Json(snapshot)).into_response()
}

pub async fn pay_debtor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<ClientId>,
    Json(body): Json<dto::PaymentRequest>,
) -> Response {
    record_payment(&services, &session, Some(id), body.amount).await
}

/// Same as [`pay_debtor`], but tolerates an empty debtor selection.
pub async fn pay_selected(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::SelectedPaymentRequest>,
) -> Response {
    record_payment(&services, &session, body.client_id, body.amount).await
}

async fn record_payment(
    services: &AppServices,
    session: &SessionContext,
    client: Option<ClientId>,
    amount: Decimal,
) -> Response {
    if let Err(e) = authz::require(session, Permission::ACCOUNTS) {
        return errors::forbidden(e);
    }

    let mut view = ReceivablesView::new(services.ledger(session));
    match view.record_payment(client, amount).await {
        Ok(PaymentOutcome::Applied) => (StatusCode::OK, Json(view.into_snapshot())).into_response(),
        Ok(PaymentOutcome::Skipped) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::receivables_error(e),
    }
}
