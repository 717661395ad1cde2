//! Per-step policies of the purchase saga.

use std::time::Duration;

use crate::executor::RetryPolicy;

/// Price used when the catalog is unreachable and no cached price exists.
pub const DEFAULT_FLIGHT_VALUE: f64 = 100.00;

/// Timeouts, retry budget and fallback constants for each saga step.
///
/// Defaults:
/// - flight lookup: 3 attempts, backoff 2s doubling up to 10s, 10s per attempt
/// - exchange rate: one attempt, 10s
/// - sell: one attempt, 10s strict / 2s fault tolerant
/// - bonus credit: 10s strict / 5s fault tolerant
#[derive(Debug, Clone, PartialEq)]
pub struct SagaConfig {
    pub flight_lookup: RetryPolicy,
    pub rate_timeout: Duration,
    pub sell_timeout: Duration,
    pub sell_timeout_fault_tolerant: Duration,
    pub bonus_timeout: Duration,
    pub bonus_timeout_fault_tolerant: Duration,
    pub default_flight_value: f64,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            flight_lookup: RetryPolicy::exponential(
                3,
                Duration::from_secs(2),
                Duration::from_secs(10),
                Duration::from_secs(10),
            ),
            rate_timeout: Duration::from_secs(10),
            sell_timeout: Duration::from_secs(10),
            sell_timeout_fault_tolerant: Duration::from_secs(2),
            bonus_timeout: Duration::from_secs(10),
            bonus_timeout_fault_tolerant: Duration::from_secs(5),
            default_flight_value: DEFAULT_FLIGHT_VALUE,
        }
    }
}

impl SagaConfig {
    /// Sets the retry policy of the flight lookup.
    pub fn with_flight_lookup(mut self, policy: RetryPolicy) -> Self {
        self.flight_lookup = policy;
        self
    }

    /// Sets the exchange rate timeout.
    pub fn with_rate_timeout(mut self, timeout: Duration) -> Self {
        self.rate_timeout = timeout;
        self
    }

    /// Sets the sell timeouts for strict and fault-tolerant sagas.
    pub fn with_sell_timeouts(mut self, strict: Duration, fault_tolerant: Duration) -> Self {
        self.sell_timeout = strict;
        self.sell_timeout_fault_tolerant = fault_tolerant;
        self
    }

    /// Sets the bonus credit timeouts for strict and fault-tolerant sagas.
    pub fn with_bonus_timeouts(mut self, strict: Duration, fault_tolerant: Duration) -> Self {
        self.bonus_timeout = strict;
        self.bonus_timeout_fault_tolerant = fault_tolerant;
        self
    }

    /// Sets the price used when neither the catalog nor the cache can answer.
    pub fn with_default_flight_value(mut self, value: f64) -> Self {
        self.default_flight_value = value;
        self
    }

    /// Sell deadline for the given mode.
    pub fn sell_timeout_for(&self, fault_tolerant: bool) -> Duration {
        if fault_tolerant {
            self.sell_timeout_fault_tolerant
        } else {
            self.sell_timeout
        }
    }

    /// Bonus credit deadline for the given mode.
    pub fn bonus_timeout_for(&self, fault_tolerant: bool) -> Duration {
        if fault_tolerant {
            self.bonus_timeout_fault_tolerant
        } else {
            self.bonus_timeout
        }
    }
}
