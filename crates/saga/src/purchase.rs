//! Inbound purchase request and the single result it produces.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SagaError;

/// A request to buy one seat on a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Flight number, e.g. `AA100`.
    pub flight: String,
    /// Flight date as `YYYY-MM-DD`.
    pub day: String,
    /// Buyer receiving the loyalty bonus.
    pub user: String,
    /// Selects fallback behaviour instead of failing fast.
    #[serde(default, rename = "ft", alias = "fault_tolerant")]
    pub fault_tolerant: bool,
}

impl PurchaseRequest {
    pub fn new(
        flight: impl Into<String>,
        day: impl Into<String>,
        user: impl Into<String>,
        fault_tolerant: bool,
    ) -> Self {
        Self {
            flight: flight.into(),
            day: day.into(),
            user: user.into(),
            fault_tolerant,
        }
    }

    /// Checks that every field is usable before any collaborator is called.
    pub fn validate(&self) -> Result<(), SagaError> {
        if self.flight.trim().is_empty() {
            return Err(SagaError::Validation("flight must not be empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(SagaError::Validation("user must not be empty".to_string()));
        }
        NaiveDate::parse_from_str(&self.day, "%Y-%m-%d").map_err(|e| {
            SagaError::Validation(format!("day '{}' is not a YYYY-MM-DD date: {e}", self.day))
        })?;
        Ok(())
    }
}

/// Outcome of a completed purchase, possibly built from fallback values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResult {
    pub success: bool,
    pub message: String,
    pub transaction_id: Option<String>,
    #[serde(rename = "value_in_dollars")]
    pub value_usd: Option<f64>,
    #[serde(rename = "value_in_reais")]
    pub value_local: Option<f64>,
    pub bonus_credited: Option<i64>,
}

impl PurchaseResult {
    /// A successful purchase.
    pub fn completed(transaction_id: String, value_usd: f64, value_local: f64, bonus: i64) -> Self {
        Self {
            success: true,
            message: format!("Purchase completed. Transaction: {transaction_id}"),
            transaction_id: Some(transaction_id),
            value_usd: Some(value_usd),
            value_local: Some(value_local),
            bonus_credited: Some(bonus),
        }
    }
}
