//! HTTP application wiring (axum router + shared services).
//!
//! - `services.rs`: the backend client, session codec and config shared by handlers
//! - `routes/`: one file per view
//! - `dto.rs`: request/response bodies that are not domain types
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(config: ApiConfig) -> Router {
    let services = Arc::new(services::AppServices::new(config));
    let auth_state = middleware::AuthState {
        sessions: services.sessions.clone(),
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(services))
                .layer(axum::middleware::from_fn_with_state(auth_state, middleware::route_guard)),
        )
}
