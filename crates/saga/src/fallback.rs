//! Shared fallback sources read by every saga in the process.

use crate::cache::FlightValueCache;
use crate::history::RateHistory;

/// The only mutable state shared between concurrent sagas.
///
/// Create one per process and hand it to the coordinator behind an `Arc`.
#[derive(Debug, Default)]
pub struct FallbackState {
    /// Last observed flight prices.
    pub flight_values: FlightValueCache,
    /// Last observed exchange rates.
    pub rates: RateHistory,
}

impl FallbackState {
    /// Creates an empty price cache and a seeded rate history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state around an existing cache and history.
    pub fn with_parts(flight_values: FlightValueCache, rates: RateHistory) -> Self {
        Self {
            flight_values,
            rates,
        }
    }
}
