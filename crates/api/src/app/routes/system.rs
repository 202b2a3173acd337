use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::dto::SessionView;
use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Name and role shown in the navigation shell.
pub async fn session(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(SessionView::from(&session))
}
