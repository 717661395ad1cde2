//! Loyalty program: bonus point crediting.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::{BonusReceipt, BonusRequest};
use reqwest::Client;

use super::http::{endpoint, read_json};
use crate::error::ServiceError;

/// Name of the fidelity service in logs and errors.
pub const SERVICE_NAME: &str = "fidelity";

/// Trait for crediting loyalty points.
#[async_trait]
pub trait LoyaltyProgram: Send + Sync {
    /// Adds `bonus` points to the user's balance.
    async fn credit_bonus(&self, user: &str, bonus: i64) -> Result<BonusReceipt, ServiceError>;
}

/// Fidelity service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLoyaltyProgram {
    client: Client,
    base_url: String,
}

impl HttpLoyaltyProgram {
    /// Creates a client for the loyalty program at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl LoyaltyProgram for HttpLoyaltyProgram {
    async fn credit_bonus(&self, user: &str, bonus: i64) -> Result<BonusReceipt, ServiceError> {
        let body = BonusRequest {
            user: user.to_string(),
            bonus,
        };
        let response = self
            .client
            .post(endpoint(&self.base_url, "/bonus"))
            .json(&body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[derive(Debug, Default)]
struct InMemoryLoyaltyState {
    balances: HashMap<String, i64>,
    call_count: usize,
    fail_on_credit: Option<ServiceError>,
    reject_credits: bool,
    delay: Duration,
}

/// In-memory fidelity service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoyaltyProgram {
    state: Arc<RwLock<InMemoryLoyaltyState>>,
}

impl InMemoryLoyaltyProgram {
    /// Creates a program with no balances that accepts every credit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with `error` until cleared with `None`.
    pub fn set_fail_on_credit(&self, error: Option<ServiceError>) {
        self.state.write().unwrap().fail_on_credit = error;
    }

    /// Makes calls answer 200 with an `"error"` receipt instead of crediting.
    pub fn set_reject_credits(&self, reject: bool) {
        self.state.write().unwrap().reject_credits = reject;
    }

    /// Delays every call by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state.write().unwrap().delay = delay;
    }

    /// Number of calls received, including failed ones.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().call_count
    }

    /// Points credited to `user` so far.
    pub fn balance(&self, user: &str) -> i64 {
        self.state
            .read()
            .unwrap()
            .balances
            .get(user)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl LoyaltyProgram for InMemoryLoyaltyProgram {
    async fn credit_bonus(&self, user: &str, bonus: i64) -> Result<BonusReceipt, ServiceError> {
        let delay = {
            let mut state = self.state.write().unwrap();
            state.call_count += 1;
            state.delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().unwrap();
        if let Some(err) = state.fail_on_credit.clone() {
            return Err(err);
        }
        if state.reject_credits {
            return Ok(BonusReceipt::error(format!(
                "Could not credit bonus to {user}"
            )));
        }

        let balance = state.balances.entry(user.to_string()).or_insert(0);
        *balance += bonus;
        Ok(BonusReceipt::success(format!(
            "Bonus of {bonus} credited to {user}. Balance: {balance}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_credit_accumulates() {
        let service = InMemoryLoyaltyProgram::new();

        let receipt = service.credit_bonus("alice", 450).await.unwrap();
        assert!(receipt.is_success());
        service.credit_bonus("alice", 50).await.unwrap();

        assert_eq!(service.balance("alice"), 500);
        assert_eq!(service.balance("bob"), 0);
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test]
    async fn test_rejected_credit_keeps_balance() {
        let service = InMemoryLoyaltyProgram::new();
        service.set_reject_credits(true);

        let receipt = service.credit_bonus("alice", 450).await.unwrap();
        assert!(!receipt.is_success());
        assert_eq!(service.balance("alice"), 0);
    }

    #[tokio::test]
    async fn test_fail_on_credit() {
        let service = InMemoryLoyaltyProgram::new();
        service.set_fail_on_credit(Some(ServiceError::server_error("cooldown")));

        assert!(service.credit_bonus("alice", 450).await.is_err());
        assert_eq!(service.balance("alice"), 0);
    }
}
