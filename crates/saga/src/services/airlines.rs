//! Flight catalog: price lookup and ticket sale.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::{FILLER_FLIGHT_VALUE, FlightQuote, SEED_FLIGHTS, SellReceipt, SellRequest};
use reqwest::Client;

use super::http::{endpoint, read_json};
use crate::error::ServiceError;

/// Name of the catalog in logs and errors.
pub const SERVICE_NAME: &str = "airlines-hub";

/// Trait for the flight catalog operations used by the saga.
#[async_trait]
pub trait FlightCatalog: Send + Sync {
    /// Returns the dollar price of a flight on a day.
    async fn flight(&self, flight: &str, day: &str) -> Result<FlightQuote, ServiceError>;

    /// Sells a seat and returns the transaction identifier.
    async fn sell(&self, flight: &str, day: &str) -> Result<SellReceipt, ServiceError>;
}

/// Flight catalog reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFlightCatalog {
    client: Client,
    base_url: String,
}

impl HttpFlightCatalog {
    /// Creates a client for the catalog at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FlightCatalog for HttpFlightCatalog {
    async fn flight(&self, flight: &str, day: &str) -> Result<FlightQuote, ServiceError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "/flight"))
            .query(&[("flight", flight), ("day", day)])
            .send()
            .await?;
        read_json(response).await
    }

    async fn sell(&self, flight: &str, day: &str) -> Result<SellReceipt, ServiceError> {
        let body = SellRequest {
            flight: flight.to_string(),
            day: day.to_string(),
        };
        let response = self
            .client
            .post(endpoint(&self.base_url, "/sell"))
            .json(&body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    flights: HashMap<(String, String), f64>,
    transactions: HashMap<String, (String, String)>,
    next_id: u32,
    lookup_count: usize,
    sell_count: usize,
    scripted_lookup_failures: VecDeque<ServiceError>,
    fail_on_lookup: Option<ServiceError>,
    fail_on_sell: Option<ServiceError>,
    lookup_delay: Duration,
    sell_delay: Duration,
}

/// In-memory flight catalog for testing.
///
/// Starts with the seed flights and quotes a filler price for unknown pairs.
/// Failures and delays can be injected per operation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlightCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryFlightCatalog {
    /// Creates a catalog holding the seed flights.
    pub fn new() -> Self {
        let catalog = Self::default();
        {
            let mut state = catalog.state.write().unwrap();
            for (flight, day, value) in SEED_FLIGHTS {
                state
                    .flights
                    .insert((flight.to_string(), day.to_string()), value);
            }
        }
        catalog
    }

    /// Sets the price of a flight on a day.
    pub fn set_flight_value(&self, flight: &str, day: &str, value: f64) {
        self.state
            .write()
            .unwrap()
            .flights
            .insert((flight.to_string(), day.to_string()), value);
    }

    /// Makes every lookup fail with `error` until cleared with `None`.
    pub fn set_fail_on_lookup(&self, error: Option<ServiceError>) {
        self.state.write().unwrap().fail_on_lookup = error;
    }

    /// Makes the next `times` lookups fail with `error`, then recover.
    pub fn fail_next_lookups(&self, error: ServiceError, times: usize) {
        let mut state = self.state.write().unwrap();
        for _ in 0..times {
            state.scripted_lookup_failures.push_back(error.clone());
        }
    }

    /// Makes every sell fail with `error` until cleared with `None`.
    pub fn set_fail_on_sell(&self, error: Option<ServiceError>) {
        self.state.write().unwrap().fail_on_sell = error;
    }

    /// Delays every lookup by `delay`.
    pub fn set_lookup_delay(&self, delay: Duration) {
        self.state.write().unwrap().lookup_delay = delay;
    }

    /// Delays every sell by `delay`.
    pub fn set_sell_delay(&self, delay: Duration) {
        self.state.write().unwrap().sell_delay = delay;
    }

    /// Number of lookup calls received, including failed ones.
    pub fn lookup_count(&self) -> usize {
        self.state.read().unwrap().lookup_count
    }

    /// Number of sell calls received, including failed ones.
    pub fn sell_count(&self) -> usize {
        self.state.read().unwrap().sell_count
    }

    /// Number of completed sales.
    pub fn transaction_count(&self) -> usize {
        self.state.read().unwrap().transactions.len()
    }
}

#[async_trait]
impl FlightCatalog for InMemoryFlightCatalog {
    async fn flight(&self, flight: &str, day: &str) -> Result<FlightQuote, ServiceError> {
        let delay = {
            let mut state = self.state.write().unwrap();
            state.lookup_count += 1;
            state.lookup_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().unwrap();
        if let Some(err) = state.scripted_lookup_failures.pop_front() {
            return Err(err);
        }
        if let Some(err) = state.fail_on_lookup.clone() {
            return Err(err);
        }

        let value = state
            .flights
            .get(&(flight.to_string(), day.to_string()))
            .copied()
            .unwrap_or(FILLER_FLIGHT_VALUE);

        Ok(FlightQuote {
            flight: flight.to_string(),
            day: day.to_string(),
            value,
        })
    }

    async fn sell(&self, flight: &str, day: &str) -> Result<SellReceipt, ServiceError> {
        let delay = {
            let mut state = self.state.write().unwrap();
            state.sell_count += 1;
            state.sell_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().unwrap();
        if let Some(err) = state.fail_on_sell.clone() {
            return Err(err);
        }

        state.next_id += 1;
        let transaction_id = format!("TX-{:04}", state.next_id);
        state.transactions.insert(
            transaction_id.clone(),
            (flight.to_string(), day.to_string()),
        );

        Ok(SellReceipt { transaction_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_and_filler_prices() {
        let catalog = InMemoryFlightCatalog::new();

        let quote = catalog.flight("AA100", "2025-01-15").await.unwrap();
        assert_eq!(quote.value, 450.0);

        let quote = catalog.flight("ZZ999", "2030-01-01").await.unwrap();
        assert_eq!(quote.value, FILLER_FLIGHT_VALUE);
        assert_eq!(quote.flight, "ZZ999");
        assert_eq!(catalog.lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_scripted_failures_recover() {
        let catalog = InMemoryFlightCatalog::new();
        catalog.fail_next_lookups(ServiceError::server_error("busy"), 2);

        assert!(catalog.flight("AA100", "2025-01-15").await.is_err());
        assert!(catalog.flight("AA100", "2025-01-15").await.is_err());
        assert!(catalog.flight("AA100", "2025-01-15").await.is_ok());
    }

    #[tokio::test]
    async fn test_sequential_transaction_ids() {
        let catalog = InMemoryFlightCatalog::new();

        let r1 = catalog.sell("AA100", "2025-01-15").await.unwrap();
        let r2 = catalog.sell("AA100", "2025-01-15").await.unwrap();

        assert_eq!(r1.transaction_id, "TX-0001");
        assert_eq!(r2.transaction_id, "TX-0002");
        assert_eq!(catalog.transaction_count(), 2);
    }

    #[tokio::test]
    async fn test_fail_on_sell() {
        let catalog = InMemoryFlightCatalog::new();
        catalog.set_fail_on_sell(Some(ServiceError::server_error("sold out")));

        assert!(catalog.sell("AA100", "2025-01-15").await.is_err());
        assert_eq!(catalog.sell_count(), 1);
        assert_eq!(catalog.transaction_count(), 0);
    }
}
