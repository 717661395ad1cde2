//! Ticket purchase endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use saga::{
    ExchangeRates, FlightCatalog, LoyaltyProgram, PurchaseCoordinator, PurchaseRequest,
    PurchaseResult,
};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<C, X, L>
where
    C: FlightCatalog,
    X: ExchangeRates,
    L: LoyaltyProgram,
{
    pub coordinator: PurchaseCoordinator<C, X, L>,
}

/// POST /buyTicket — run the purchase saga for one request.
#[tracing::instrument(skip(state, payload))]
pub async fn buy<C, X, L>(
    State(state): State<Arc<AppState<C, X, L>>>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseResult>, ApiError>
where
    C: FlightCatalog + 'static,
    X: ExchangeRates + 'static,
    L: LoyaltyProgram + 'static,
{
    let Json(request) = payload?;
    let result = state.coordinator.purchase_ticket(request).await?;
    Ok(Json(result))
}
