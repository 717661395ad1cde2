//! Collaborator traits consumed by the saga, with reqwest clients and
//! in-memory implementations.

pub mod airlines;
pub mod exchange;
pub mod fidelity;
mod http;

pub use airlines::{FlightCatalog, HttpFlightCatalog, InMemoryFlightCatalog};
pub use exchange::{ExchangeRates, HttpExchangeRates, InMemoryExchangeRates};
pub use fidelity::{HttpLoyaltyProgram, InMemoryLoyaltyProgram, LoyaltyProgram};
