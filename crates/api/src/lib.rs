//! HTTP API server for the ticket purchase saga.
//!
//! Exposes `POST /buyTicket`, a liveness check and Prometheus metrics, with
//! structured logging (tracing) around every request.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::{
    ExchangeRates, FallbackState, FlightCatalog, HttpExchangeRates, HttpFlightCatalog,
    HttpLoyaltyProgram, LoyaltyProgram, PurchaseCoordinator,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::tickets::AppState;

/// Application state backed by the HTTP collaborator clients.
pub type HttpAppState = AppState<HttpFlightCatalog, HttpExchangeRates, HttpLoyaltyProgram>;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, X, L>(
    state: Arc<AppState<C, X, L>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    C: FlightCatalog + 'static,
    X: ExchangeRates + 'static,
    L: LoyaltyProgram + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/buyTicket", post(routes::tickets::buy::<C, X, L>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with HTTP clients for the three
/// collaborators and a fresh price cache and rate history.
pub fn create_default_state(config: &Config) -> Result<Arc<HttpAppState>, reqwest::Error> {
    let client = reqwest::Client::builder().build()?;

    let coordinator = PurchaseCoordinator::new(
        HttpFlightCatalog::new(client.clone(), config.airlines_hub_url.as_str()),
        HttpExchangeRates::new(client.clone(), config.exchange_url.as_str()),
        HttpLoyaltyProgram::new(client, config.fidelity_url.as_str()),
        Arc::new(FallbackState::new()),
    );

    Ok(Arc::new(AppState { coordinator }))
}
