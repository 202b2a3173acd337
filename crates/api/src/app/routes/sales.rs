use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use papeleria_auth::Permission;
use papeleria_core::SaleId;
use papeleria_parties::NewClientForm;
use papeleria_sales::{BillingCart, CartError, Sale};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_sale))
        .route("/catalog", get(catalog))
        .route("/history", get(history))
        .route("/clients", post(create_client))
        .route("/:id", get(get_sale))
}

/// Products, clients and payment methods for the billing screen, fetched together.
pub async fn catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<dto::SearchQuery>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::SALES) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    let fetched = tokio::try_join!(upstream.products(), upstream.clients(), upstream.payment_methods());
    let (mut products, clients, payment_methods) = match fetched {
        Ok(all) => all,
        Err(e) => return errors::backend_error(e),
    };
    products.retain(|p| p.matches(query.needle()));

    (
        StatusCode::OK,
        Json(dto::SalesCatalog {
            products,
            clients,
            payment_methods,
        }),
    )
        .into_response()
}

/// Every sale, newest first.
pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::SALES) {
        return errors::forbidden(e);
    }

    match services.upstream(&session).sales().await {
        Ok(mut sales) => {
            Sale::sort_newest_first(&mut sales);
            (StatusCode::OK, Json(serde_json::json!({ "items": sales }))).into_response()
        }
        Err(e) => errors::backend_error(e),
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<SaleId>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::SALES) {
        return errors::forbidden(e);
    }

    match services.upstream(&session).sale(id).await {
        Ok(sale) => (StatusCode::OK, Json(sale)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

/// Rebuilds the cart against current stock, submits it, then re-fetches the catalog.
pub async fn create_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::CreateSaleRequest>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::SALES) {
        return errors::forbidden(e);
    }
    if let Err(e) = body.precheck() {
        return errors::cart_error(e);
    }

    let upstream = services.upstream(&session);
    let products = match upstream.products().await {
        Ok(products) => products,
        Err(e) => return errors::backend_error(e),
    };

    let mut cart = BillingCart::new();
    for item in &body.items {
        let Some(product) = products.iter().find(|p| p.id == item.product_id) else {
            return errors::cart_error(CartError::UnknownProduct(item.product_id));
        };
        if let Err(e) = cart.add(product, item.quantity) {
            return errors::cart_error(e);
        }
    }

    let request = match cart.checkout(body.client_id, body.payment_method_id) {
        Ok(request) => request,
        Err(e) => return errors::cart_error(e),
    };
    if let Err(e) = upstream.create_sale(&request).await {
        return errors::backend_error(e);
    }
    tracing::info!(
        client = %request.client_id,
        lines = request.items.len(),
        total = %cart.total().amount(),
        "sale registered"
    );

    let products = match upstream.products().await {
        Ok(products) => products,
        Err(e) => return errors::backend_error(e),
    };
    (
        StatusCode::CREATED,
        Json(dto::SaleReceipt {
            total: cart.total(),
            items: cart.lines().len(),
            products,
        }),
    )
        .into_response()
}

/// Quick client registration from the billing screen. Answers with the refreshed client list.
pub async fn create_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(form): Json<NewClientForm>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::SALES) {
        return errors::forbidden(e);
    }

    let payload = match form.into_payload() {
        Ok(payload) => payload,
        Err(e) => return errors::validation_error(e),
    };

    let upstream = services.upstream(&session);
    if let Err(e) = upstream.create_client(&payload).await {
        return errors::backend_error(e);
    }
    match upstream.clients().await {
        Ok(clients) => (StatusCode::CREATED, Json(serde_json::json!({ "items": clients }))).into_response(),
        Err(e) => errors::backend_error(e),
    }
}
