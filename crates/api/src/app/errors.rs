//! Uniform JSON error bodies: `{ "error": <code>, "message": <text> }`.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use papeleria_accounting::{PaymentRejection, ReceivablesError};
use papeleria_auth::AuthzError;
use papeleria_core::{DomainError, ValidationErrors};
use papeleria_infra::BackendError;
use papeleria_infra::backend::client::CONNECTION_FAILED;
use papeleria_sales::{CartError, QuoteError};

use crate::session::expired_cookie;

pub const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 422 with one entry per failing field. No upstream call was made.
pub fn validation_error(errors: ValidationErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "validation_error",
            "message": errors.to_string(),
            "fields": errors,
        })),
    )
        .into_response()
}

/// Maps gateway failures.
///
/// - rejection: upstream status and message, verbatim
/// - refused bearer token: session cleared, `401 session_expired`
/// - connection failure: fixed message, `502`
pub fn backend_error(err: BackendError) -> Response {
    match err {
        BackendError::Rejected { status, message } => {
            let status = StatusCode::from_u16(status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            json_error(status, "backend_rejected", message)
        }
        BackendError::Unauthorized => {
            let mut response = json_error(
                StatusCode::UNAUTHORIZED,
                "session_expired",
                "La sesión expiró, inicie sesión nuevamente",
            );
            response.headers_mut().insert(header::SET_COOKIE, expired_cookie());
            response
        }
        BackendError::Network(e) => {
            tracing::error!(error = %e, "backend unreachable");
            json_error(StatusCode::BAD_GATEWAY, "backend_unreachable", CONNECTION_FAILED)
        }
        BackendError::Decode(msg) => {
            tracing::error!(error = %msg, "undecodable backend response");
            json_error(StatusCode::BAD_GATEWAY, "backend_unreachable", CONNECTION_FAILED)
        }
    }
}

pub fn forbidden(err: AuthzError) -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn cart_error(err: CartError) -> Response {
    let field = match &err {
        CartError::MissingClient => "client_id",
        CartError::MissingPaymentMethod => "payment_method_id",
        CartError::Empty
        | CartError::InsufficientStock { .. }
        | CartError::UnknownProduct(_)
        | CartError::InvalidQuantity(_)
        | CartError::TotalOutOfRange => "items",
    };
    validation_error(ValidationErrors::single(field, err.to_string()))
}

pub fn quote_error(err: QuoteError) -> Response {
    validation_error(ValidationErrors::single("items", err.to_string()))
}

pub fn domain_error(err: DomainError) -> Response {
    match err {
        DomainError::Validation(errors) => validation_error(errors),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn receivables_error(err: ReceivablesError<BackendError>) -> Response {
    match err {
        ReceivablesError::Rejected(PaymentRejection::NonPositiveAmount) => {
            validation_error(ValidationErrors::single("amount", PaymentRejection::NonPositiveAmount.to_string()))
        }
        ReceivablesError::Ledger(e) => backend_error(e),
    }
}
