//! Dollar exchange rate simulator.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use common::{HealthStatus, RateQuote};
use rand::Rng;

use crate::faults::{FaultInjector, FaultProfile, InjectedFault};

pub const SERVICE_NAME: &str = "Exchange";
pub const DEFAULT_PORT: u16 = 8002;

/// Lowest and highest rate ever quoted.
pub const RATE_RANGE: (f64, f64) = (5.0, 6.0);

pub struct ExchangeState {
    faults: FaultInjector,
}

impl ExchangeState {
    pub fn new(fault_injection: bool) -> Self {
        let faults = if fault_injection {
            FaultInjector::new(
                "exchange.convert",
                "Exchange service is down",
                FaultProfile::none().with_failure_window(0.1, Duration::from_secs(5)),
            )
        } else {
            FaultInjector::disabled("exchange.convert")
        };
        Self { faults }
    }
}

/// Draws a rate uniformly from [`RATE_RANGE`], rounded to cents.
pub fn draw_rate() -> f64 {
    let (low, high) = RATE_RANGE;
    let rate = rand::rng().random_range(low..=high);
    (rate * 100.0).round() / 100.0
}

pub fn router(state: Arc<ExchangeState>) -> Router {
    Router::new()
        .route("/convert", get(convert))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /convert
async fn convert(
    State(state): State<Arc<ExchangeState>>,
) -> Result<Json<RateQuote>, InjectedFault> {
    state.faults.inject().await?;
    Ok(Json(RateQuote {
        exchange_rate: draw_rate(),
    }))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}
