//! Flight catalog and ticket sales simulator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{
    FILLER_FLIGHT_VALUE, FlightQuote, HealthStatus, SEED_FLIGHTS, SellReceipt, SellRequest,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::faults::{FaultInjector, FaultProfile, InjectedFault};

pub const SERVICE_NAME: &str = "AirlinesHub";
pub const DEFAULT_PORT: u16 = 8001;

/// A ticket sold by the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldTicket {
    pub flight: String,
    pub day: String,
}

/// Flight prices, sold tickets and the fault injectors of both endpoints.
pub struct AirlinesHubState {
    flights: HashMap<(String, String), f64>,
    transactions: RwLock<HashMap<String, SoldTicket>>,
    flight_faults: FaultInjector,
    sell_faults: FaultInjector,
}

impl AirlinesHubState {
    /// Seeded catalog with faults on (`fault_injection`) or off.
    pub fn new(fault_injection: bool) -> Self {
        let (flight_faults, sell_faults) = if fault_injection {
            (
                FaultInjector::new(
                    "airlines-hub.flight",
                    "AirlinesHub lookup failed",
                    FaultProfile::none()
                        .with_delay(0.1, Duration::from_secs(3))
                        .with_errors(0.1),
                ),
                // Delays above 2s trip the fault-tolerant sell deadline.
                FaultInjector::new(
                    "airlines-hub.sell",
                    "AirlinesHub sale failed",
                    FaultProfile::none()
                        .with_delay(0.2, Duration::from_secs(3))
                        .with_errors(0.05),
                ),
            )
        } else {
            (
                FaultInjector::disabled("airlines-hub.flight"),
                FaultInjector::disabled("airlines-hub.sell"),
            )
        };

        let flights = SEED_FLIGHTS
            .iter()
            .map(|(flight, day, value)| ((flight.to_string(), day.to_string()), *value))
            .collect();

        Self {
            flights,
            transactions: RwLock::new(HashMap::new()),
            flight_faults,
            sell_faults,
        }
    }

    /// Seeded record, or a filler record for unknown pairs.
    pub fn quote(&self, flight: &str, day: &str) -> FlightQuote {
        let value = self
            .flights
            .get(&(flight.to_string(), day.to_string()))
            .copied()
            .unwrap_or(FILLER_FLIGHT_VALUE);
        FlightQuote {
            flight: flight.to_string(),
            day: day.to_string(),
            value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FlightQuery {
    pub flight: String,
    pub day: String,
}

/// Routes of the airlines hub.
pub fn router(state: Arc<AirlinesHubState>) -> Router {
    Router::new()
        .route("/flight", get(flight))
        .route("/sell", post(sell))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /flight?flight=..&day=..
async fn flight(
    State(state): State<Arc<AirlinesHubState>>,
    Query(query): Query<FlightQuery>,
) -> Result<Json<FlightQuote>, InjectedFault> {
    state.flight_faults.inject().await?;
    Ok(Json(state.quote(&query.flight, &query.day)))
}

/// POST /sell
async fn sell(
    State(state): State<Arc<AirlinesHubState>>,
    Json(request): Json<SellRequest>,
) -> Result<Json<SellReceipt>, InjectedFault> {
    state.sell_faults.inject().await?;

    let transaction_id = Uuid::new_v4().to_string();
    let sold = {
        let mut transactions = state.transactions.write().await;
        transactions.insert(
            transaction_id.clone(),
            SoldTicket {
                flight: request.flight,
                day: request.day,
            },
        );
        transactions.len()
    };
    tracing::info!(%transaction_id, sold, "ticket sold");

    Ok(Json(SellReceipt { transaction_id }))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}
