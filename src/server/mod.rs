//! HTTP API in front of the aggregation core.

pub mod error;
pub mod params;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{Method, header::CONTENT_TYPE};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::output::TraceLog;
use crate::services::DiseaseApi;
use crate::webhook::Webhook;

/// Per-process state shared by every handler. Holds no request data.
pub struct AppState {
    pub api: Arc<dyn DiseaseApi>,
    pub trace_log: TraceLog,
    pub webhook: Webhook,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/covid/casesByPeriod", get(routes::cases_by_period))
        .route("/api/covid/rateChange", get(routes::rate_change))
        .route("/api/covid/topCountries", get(routes::get_top_countries))
        .route("/api/covid/countryList", get(routes::get_country_list))
        .route("/health", get(routes::health))
        .layer((TraceLayer::new_for_http(), cors))
        .with_state(state)
}

/// Binds `address` and serves until Ctrl+C or SIGTERM.
pub async fn serve(address: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
