//! Staff accounts. Every handler requires the ADMIN role.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};

use papeleria_auth::{NewUserForm, Permission};
use papeleria_core::UserId;
use papeleria_infra::AuthorizedClient;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", delete(delete_user))
}

async fn listing(upstream: AuthorizedClient<'_>, status: StatusCode) -> Response {
    match upstream.users().await {
        Ok(users) => (status, Json(serde_json::json!({ "items": users }))).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::USERS_MANAGE) {
        return errors::forbidden(e);
    }
    listing(services.upstream(&session), StatusCode::OK).await
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<NewUserForm>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::USERS_MANAGE) {
        return errors::forbidden(e);
    }

    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(e) => return errors::validation_error(e),
    };
    let upstream = services.upstream(&session);
    if let Err(e) = upstream.create_user(&payload).await {
        return errors::backend_error(e);
    }
    tracing::info!(cedula = %payload.cedula, role_id = payload.role_id, "staff account created");

    listing(upstream, StatusCode::CREATED).await
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<UserId>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::USERS_MANAGE) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    if let Err(e) = upstream.delete_user(id).await {
        return errors::backend_error(e);
    }
    tracing::info!(user = %id, "staff account deleted");

    listing(upstream, StatusCode::OK).await
}
