//! The four steps of the purchase saga.

use serde::{Deserialize, Serialize};

/// A step of the purchase pipeline, in execution order.
///
/// ```text
/// LookupFlight ──► QuoteRate ──► SellTicket ──► CreditBonus
/// ```
///
/// Each step carries its own fault-tolerance policy; `SellTicket` is the only
/// step that changes state at a collaborator and never falls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStep {
    /// Read the flight's dollar price from the catalog.
    LookupFlight,

    /// Read the current exchange rate.
    QuoteRate,

    /// Commit the sale at the catalog.
    SellTicket,

    /// Credit loyalty points to the buyer.
    CreditBonus,
}

impl PurchaseStep {
    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStep::LookupFlight => "lookup_flight",
            PurchaseStep::QuoteRate => "quote_rate",
            PurchaseStep::SellTicket => "sell_ticket",
            PurchaseStep::CreditBonus => "credit_bonus",
        }
    }
}

impl std::fmt::Display for PurchaseStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
