//! Saga pattern implementation for ticket purchases.
//!
//! A purchase spans three independent services and completes without a
//! distributed transaction. Each step applies its own fault-tolerance policy:
//! 1. Look up the flight price (retry with backoff, then cached/default price)
//! 2. Quote the exchange rate (single attempt, then history average)
//! 3. Sell the ticket (single attempt with a tight deadline, no fallback)
//! 4. Credit loyalty points (best-effort when fault tolerant)
//!
//! The fallback sources live in a [`FallbackState`] shared by all sagas.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod history;
pub mod outcome;
pub mod purchase;
pub mod services;
pub mod step;

pub use cache::{FlightKey, FlightValueCache};
pub use config::{DEFAULT_FLIGHT_VALUE, SagaConfig};
pub use coordinator::{PurchaseCoordinator, bonus_points};
pub use dispatcher::{DispatchOutcome, FireAndForget};
pub use error::{SagaError, ServiceError};
pub use executor::{ResilientCall, RetryPolicy, RetryPredicate};
pub use fallback::FallbackState;
pub use history::{HISTORY_CAPACITY, RateHistory, SEED_RATES};
pub use outcome::CallOutcome;
pub use purchase::{PurchaseRequest, PurchaseResult};
pub use services::{
    ExchangeRates, FlightCatalog, HttpExchangeRates, HttpFlightCatalog, HttpLoyaltyProgram,
    InMemoryExchangeRates, InMemoryFlightCatalog, InMemoryLoyaltyProgram, LoyaltyProgram,
};
pub use step::PurchaseStep;
