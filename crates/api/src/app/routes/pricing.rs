use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;

use papeleria_auth::Permission;
use papeleria_core::ValidationErrors;
use papeleria_sales::Quote;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/catalog", get(catalog))
        .route("/quote", post(quote))
}

pub async fn catalog(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<dto::SearchQuery>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::PRICING) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    let (mut products, clients) = match tokio::try_join!(upstream.products(), upstream.clients()) {
        Ok(both) => both,
        Err(e) => return errors::backend_error(e),
    };
    products.retain(|p| p.matches(query.needle()));

    (StatusCode::OK, Json(dto::PricingCatalog { products, clients })).into_response()
}

/// Prices a quote at current catalog prices. Nothing is stored upstream.
pub async fn quote(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::QuoteRequest>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::PRICING) {
        return errors::forbidden(e);
    }

    let upstream = services.upstream(&session);
    let (products, clients) = match tokio::try_join!(upstream.products(), upstream.clients()) {
        Ok(both) => both,
        Err(e) => return errors::backend_error(e),
    };

    let client = match body.client_id {
        Some(id) => match clients.iter().find(|c| c.id == id) {
            Some(c) => Some(c.name.clone()),
            None => return errors::validation_error(ValidationErrors::single("client_id", "Cliente no encontrado")),
        },
        None => None,
    };

    let mut quote = Quote::new(client);
    for item in &body.items {
        let Some(product) = products.iter().find(|p| p.id == item.product_id) else {
            return errors::validation_error(ValidationErrors::single(
                "items",
                format!("producto no encontrado: {}", item.product_id),
            ));
        };
        if let Err(e) = quote.add_qty(product, item.qty) {
            return errors::quote_error(e);
        }
    }

    let view = dto::QuoteView {
        text: quote.render_text(Utc::now()),
        total: quote.total(),
        lines: quote.lines().to_vec(),
        client: quote.client,
    };
    (StatusCode::OK, Json(view)).into_response()
}
