use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};

use papeleria_auth::Permission;
use papeleria_core::ProductId;
use papeleria_infra::{AuthorizedClient, BackendError};
use papeleria_products::{CatalogQuery, InventoryStats, ProductForm, ProductPayload};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/categories", get(list_categories))
        .route("/products", post(create_product))
        .route("/products/:id", patch(update_product).delete(delete_product))
}

async fn inventory_view(
    upstream: AuthorizedClient<'_>,
    query: &CatalogQuery,
    threshold: i64,
) -> Result<dto::InventoryView, BackendError> {
    let products = upstream.products().await?;
    Ok(dto::InventoryView {
        stats: InventoryStats::compute(&products, threshold),
        page: query.apply(&products),
    })
}

/// Filtered page of the product table plus header stats over the full list.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::INVENTORY_READ) {
        return errors::forbidden(e);
    }

    match inventory_view(services.upstream(&session), &query, services.config.low_stock_threshold).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::INVENTORY_READ) {
        return errors::forbidden(e);
    }

    match services.upstream(&session).categories().await {
        Ok(categories) => (StatusCode::OK, Json(serde_json::json!({ "items": categories }))).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

/// Validates the form and resolves its category name against the backend.
async fn resolve_form(upstream: AuthorizedClient<'_>, form: ProductForm) -> Result<ProductPayload, Response> {
    let categories = upstream.categories().await.map_err(errors::backend_error)?;
    form.into_payload(&categories).map_err(errors::validation_error)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<ProductForm>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::INVENTORY_WRITE) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    let payload = match resolve_form(upstream, form).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    if let Err(e) = upstream.create_product(&payload).await {
        return errors::backend_error(e);
    }
    tracing::info!(product = %payload.name, "product created");

    refreshed(&services, upstream, StatusCode::CREATED).await
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::INVENTORY_WRITE) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    let payload = match resolve_form(upstream, form).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    if let Err(e) = upstream.update_product(id, &payload).await {
        return errors::backend_error(e);
    }
    tracing::info!(product = %id, "product updated");

    refreshed(&services, upstream, StatusCode::OK).await
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<ProductId>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::INVENTORY_WRITE) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    if let Err(e) = upstream.delete_product(id).await {
        return errors::backend_error(e);
    }
    tracing::info!(product = %id, "product deleted");

    refreshed(&services, upstream, StatusCode::OK).await
}

/// After any mutation the first page is re-fetched rather than patched locally.
async fn refreshed(services: &AppServices, upstream: AuthorizedClient<'_>, status: StatusCode) -> Response {
    match inventory_view(upstream, &CatalogQuery::default(), services.config.low_stock_threshold).await {
        Ok(view) => (status, Json(view)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}
