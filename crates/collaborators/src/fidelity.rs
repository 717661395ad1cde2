//! Loyalty program simulator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{BonusBalance, BonusReceipt, BonusRequest, HealthStatus};
use tokio::sync::RwLock;

use crate::faults::{FaultInjector, FaultProfile, InjectedFault};

pub const SERVICE_NAME: &str = "Fidelity";
pub const DEFAULT_PORT: u16 = 8003;

/// Per-user bonus balances.
pub struct FidelityState {
    balances: RwLock<HashMap<String, f64>>,
    faults: FaultInjector,
}

impl FidelityState {
    pub fn new(fault_injection: bool) -> Self {
        let faults = if fault_injection {
            FaultInjector::new(
                "fidelity.bonus",
                "Fidelity service is down",
                FaultProfile::none().with_failure_window(0.1, Duration::from_secs(30)),
            )
        } else {
            FaultInjector::disabled("fidelity.bonus")
        };
        Self {
            balances: RwLock::new(HashMap::new()),
            faults,
        }
    }

    /// Adds `bonus` to the user's balance and returns the new balance.
    pub async fn credit(&self, user: &str, bonus: i64) -> f64 {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(user.to_string()).or_insert(0.0);
        *balance += bonus as f64;
        *balance
    }

    /// Current balance; unknown users have zero.
    pub async fn balance(&self, user: &str) -> f64 {
        self.balances.read().await.get(user).copied().unwrap_or(0.0)
    }
}

pub fn router(state: Arc<FidelityState>) -> Router {
    Router::new()
        .route("/bonus", post(bonus))
        .route("/user/{user_id}", get(user_balance))
        .route("/health", get(health))
        .with_state(state)
}

/// POST /bonus
async fn bonus(
    State(state): State<Arc<FidelityState>>,
    Json(request): Json<BonusRequest>,
) -> Result<Json<BonusReceipt>, InjectedFault> {
    state.faults.inject().await?;

    let balance = state.credit(&request.user, request.bonus).await;
    tracing::info!(user = %request.user, bonus = request.bonus, balance, "bonus credited");

    Ok(Json(BonusReceipt::success(format!(
        "Bonus of {} credited to user {}. Total balance: {balance}",
        request.bonus, request.user
    ))))
}

/// GET /user/{user_id}
async fn user_balance(
    State(state): State<Arc<FidelityState>>,
    Path(user_id): Path<String>,
) -> Json<BonusBalance> {
    let bonus_balance = state.balance(&user_id).await;
    Json(BonusBalance {
        user: user_id,
        bonus_balance,
    })
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_credits_accumulate() {
        let state = FidelityState::new(false);
        assert_eq!(state.credit("alice", 450).await, 450.0);
        assert_eq!(state.credit("alice", 100).await, 550.0);
        assert_eq!(state.balance("alice").await, 550.0);
        assert_eq!(state.balance("bob").await, 0.0);
    }
}
