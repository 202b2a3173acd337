use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use papeleria_auth::{LoginForm, RegisterForm, SessionGrant};
use papeleria_infra::BackendError;

use crate::app::dto::SessionView;
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::middleware::LOGIN_PATH;
use crate::session::{expired_cookie, session_cookie};

pub const AUTO_LOGIN_FAILED: &str = "Registro exitoso, pero falló el inicio de sesión automático.";

/// Turns a backend grant into the signed session cookie.
fn start_session(services: &AppServices, grant: SessionGrant, status: StatusCode) -> Response {
    let (token, claims) = match services.sessions.issue(grant, Utc::now()) {
        Ok(issued) => issued,
        Err(e) => {
            tracing::error!(error = %e, "failed to sign session");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "session_error", e.to_string());
        }
    };
    tracing::info!(user = %claims.sub, role = %claims.role, "session started");

    let session = SessionContext::from_claims(claims);
    let mut response = (status, Json(SessionView::from(&session))).into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie(&token, services.config.session_max_age));
    response
}

pub async fn login(Extension(services): Extension<Arc<AppServices>>, Json(form): Json<LoginForm>) -> Response {
    if let Err(e) = form.validate() {
        return errors::validation_error(e);
    }

    match services.backend.login(&form).await {
        Ok(grant) => start_session(&services, grant, StatusCode::OK),
        Err(BackendError::Rejected { status, .. }) => {
            tracing::info!(status, "login rejected");
            errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", errors::INVALID_CREDENTIALS)
        }
        Err(e) => errors::backend_error(e),
    }
}

/// Registers upstream, then signs in with the same credentials.
pub async fn register(Extension(services): Extension<Arc<AppServices>>, Json(form): Json<RegisterForm>) -> Response {
    if let Err(e) = form.validate() {
        return errors::validation_error(e);
    }

    if let Err(e) = services.backend.register(&form).await {
        return errors::backend_error(e);
    }

    match services.backend.login(&form.login()).await {
        Ok(grant) => start_session(&services, grant, StatusCode::CREATED),
        Err(e) => {
            tracing::warn!(error = %e, "automatic sign-in after registration failed");
            (
                StatusCode::CREATED,
                [(header::LOCATION, HeaderValue::from_static(LOGIN_PATH))],
                Json(json!({
                    "registered": true,
                    "message": AUTO_LOGIN_FAILED,
                })),
            )
                .into_response()
        }
    }
}

pub async fn logout() -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, HeaderValue::from_static(LOGIN_PATH)),
            (header::SET_COOKIE, expired_cookie()),
        ],
    )
        .into_response()
}
