//! JSON bodies exchanged with the flight catalog, exchange and fidelity
//! services.

use serde::{Deserialize, Serialize};

/// Price of one flight on one day, in US dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightQuote {
    pub flight: String,
    pub day: String,
    pub value: f64,
}

/// Body of `POST /sell`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellRequest {
    pub flight: String,
    pub day: String,
}

/// Response of `POST /sell`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellReceipt {
    pub transaction_id: String,
}

/// Response of `GET /convert`: how many local currency units buy one dollar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub exchange_rate: f64,
}

/// Body of `POST /bonus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusRequest {
    pub user: String,
    pub bonus: i64,
}

/// Response of `POST /bonus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusReceipt {
    pub status: String,
    pub message: String,
}

impl BonusReceipt {
    pub const SUCCESS: &'static str = "success";
    pub const ERROR: &'static str = "error";

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Self::SUCCESS.to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Self::ERROR.to_string(),
            message: message.into(),
        }
    }

    /// Returns true if the fidelity service reported the credit as applied.
    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

/// Response of `GET /user/{id}` on the fidelity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusBalance {
    pub user: String,
    pub bonus_balance: f64,
}

/// Fixed liveness payload returned by every service's `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl HealthStatus {
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
        }
    }
}
