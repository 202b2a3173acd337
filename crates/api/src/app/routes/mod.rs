use axum::{
    Router,
    routing::{get, post},
};

pub mod accounts;
pub mod auth;
pub mod exchange;
pub mod inventory;
pub mod pricing;
pub mod reports;
pub mod sales;
pub mod system;
pub mod users;

/// Every view of the back office. The route guard decides which of them
/// need a session.
pub fn router() -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/session", get(system::session))
        .route("/dashboard", get(reports::dashboard))
        .route("/dashboard/stream", get(reports::dashboard_stream))
        .route("/reports", get(reports::analytics))
        .route("/reports/stream", get(reports::analytics_stream))
        .nest("/accounts", accounts::router())
        .nest("/sales", sales::router())
        .nest("/inventory", inventory::router())
        .nest("/pricing", pricing::router())
        .nest("/users", users::router())
        .nest("/exchange-rates", exchange::router())
}
