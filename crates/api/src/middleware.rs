use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use papeleria_auth::JwtValidator;

use crate::context::SessionContext;
use crate::session::{expired_cookie, read_session_cookie};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/dashboard";

#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<dyn JwtValidator>,
}

fn is_auth_page(path: &str) -> bool {
    matches!(path, "/login" | "/register")
}

fn is_public(path: &str) -> bool {
    is_auth_page(path) || path == "/health"
}

fn see_other(location: &'static str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, HeaderValue::from_static(location))]).into_response()
}

/// Route guard.
///
/// - no valid session on a private path: `303 -> /login`
/// - valid session on `/login` or `/register`: `303 -> /dashboard`
/// - otherwise the request continues, carrying a [`SessionContext`] when signed in
pub async fn route_guard(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let token = read_session_cookie(req.headers()).map(str::to_string);
    let claims = token
        .as_deref()
        .and_then(|t| match state.sessions.validate(t, Utc::now()) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "discarding session cookie");
                None
            }
        });

    match claims {
        Some(_) if is_auth_page(&path) => see_other(HOME_PATH),
        Some(claims) => {
            req.extensions_mut().insert(SessionContext::from_claims(claims));
            next.run(req).await
        }
        None if is_public(&path) => next.run(req).await,
        None => {
            let mut response = see_other(LOGIN_PATH);
            if token.is_some() {
                response.headers_mut().insert(header::SET_COOKIE, expired_cookie());
            }
            response
        }
    }
}
