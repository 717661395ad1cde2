//! Types shared between the purchase saga, the API and the collaborator
//! simulators.
//!
//! The wire structs keep the JSON field names the services exchange over
//! HTTP, so both sides of every call deserialize the same shapes.

pub mod catalog;
pub mod wire;

pub use catalog::{FILLER_FLIGHT_VALUE, SEED_FLIGHTS};
pub use wire::{
    BonusBalance, BonusReceipt, BonusRequest, FlightQuote, HealthStatus, RateQuote, SellReceipt,
    SellRequest,
};
