//! Dashboard and analytics views, plus their polling streams.
//!
//! Each stream owns one task that re-fetches on a fixed interval and stops as
//! soon as the client disconnects or the upstream session is refused.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use papeleria_auth::Permission;
use papeleria_infra::{AuthorizedClient, BackendError};
use papeleria_products::Product;
use papeleria_reports::{AnalyticsReport, DashboardReport};
use papeleria_sales::Sale;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::SessionContext;

/// Sales, products and the staff head count, fetched together.
///
/// Only admins may list users upstream; any other refusal counts as zero
/// users instead of failing the whole view.
async fn fetch_inputs(upstream: AuthorizedClient<'_>) -> Result<(Vec<Sale>, Vec<Product>, usize), BackendError> {
    let (sales, products, users) = tokio::join!(upstream.sales(), upstream.products(), upstream.users());
    let total_users = match users {
        Ok(users) => users.len(),
        Err(BackendError::Rejected { status, .. }) => {
            tracing::debug!(status, "user count unavailable");
            0
        }
        Err(e) => return Err(e),
    };
    Ok((sales?, products?, total_users))
}

async fn dashboard_report(services: &AppServices, session: &SessionContext) -> Result<DashboardReport, BackendError> {
    let (sales, products, users) = fetch_inputs(services.upstream(session)).await?;
    Ok(DashboardReport::build(Some(session.name()), &sales, &products, users, Utc::now()))
}

async fn analytics_report(services: &AppServices, session: &SessionContext) -> Result<AnalyticsReport, BackendError> {
    let (sales, products, users) = fetch_inputs(services.upstream(session)).await?;
    Ok(AnalyticsReport::build(&sales, &products, users, Utc::now()))
}

pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::REPORTS) {
        return errors::forbidden(e);
    }
    match dashboard_report(&services, &session).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

pub async fn analytics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::REPORTS) {
        return errors::forbidden(e);
    }
    match analytics_report(&services, &session).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::backend_error(e),
    }
}

pub async fn dashboard_stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::REPORTS) {
        return errors::forbidden(e);
    }
    let every = services.config.dashboard_refresh;
    poll_stream("dashboard", every, move || {
        let services = services.clone();
        let session = session.clone();
        async move { dashboard_report(&services, &session).await }
    })
}

pub async fn analytics_stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Err(e) = authz::require(&session, Permission::REPORTS) {
        return errors::forbidden(e);
    }
    let every = services.config.reports_refresh;
    poll_stream("reports", every, move || {
        let services = services.clone();
        let session = session.clone();
        async move { analytics_report(&services, &session).await }
    })
}

/// Spawns the polling task and exposes its output as server-sent events.
///
/// - a successful fetch emits `topic` with the JSON report
/// - a transient upstream failure emits `error` and polling continues
/// - a refused session emits `session_expired` and ends the stream
fn poll_stream<F, Fut, T>(topic: &'static str, every: Duration, mut fetch: F) -> Response
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<T, BackendError>> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Result<SseEvent, Infallible>>(4);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = tx.closed() => break,
                _ = ticker.tick() => {}
            }

            let event = match fetch().await {
                Ok(report) => {
                    let data = serde_json::to_string(&report).unwrap_or_else(|_| "{}".to_string());
                    SseEvent::default().event(topic).data(data)
                }
                Err(BackendError::Unauthorized) => {
                    let _ = tx.send(Ok(SseEvent::default().event("session_expired").data("{}"))).await;
                    break;
                }
                Err(e) => {
                    tracing::warn!(topic, error = %e, "poll failed");
                    SseEvent::default().event("error").data(e.to_string())
                }
            };
            if tx.send(Ok(event)).await.is_err() {
                break;
            }
        }
        tracing::debug!(topic, "poll stream closed");
    });

    Sse::new(ReceiverStream::new(rx))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response()
}
