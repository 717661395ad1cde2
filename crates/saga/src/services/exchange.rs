//! Exchange rate quoting.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::RateQuote;
use reqwest::Client;

use super::http::{endpoint, read_json};
use crate::error::ServiceError;

/// Name of the exchange service in logs and errors.
pub const SERVICE_NAME: &str = "exchange";

/// Trait for reading the current dollar exchange rate.
#[async_trait]
pub trait ExchangeRates: Send + Sync {
    /// Returns how many local currency units one dollar buys.
    async fn rate(&self) -> Result<RateQuote, ServiceError>;
}

/// Exchange service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpExchangeRates {
    client: Client,
    base_url: String,
}

impl HttpExchangeRates {
    /// Creates a client for the exchange service at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ExchangeRates for HttpExchangeRates {
    async fn rate(&self) -> Result<RateQuote, ServiceError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "/convert"))
            .send()
            .await?;
        read_json(response).await
    }
}

#[derive(Debug)]
struct InMemoryExchangeState {
    rate: f64,
    call_count: usize,
    fail_on_rate: Option<ServiceError>,
    delay: Duration,
}

/// In-memory exchange service for testing; quotes a fixed rate.
#[derive(Debug, Clone)]
pub struct InMemoryExchangeRates {
    state: Arc<RwLock<InMemoryExchangeState>>,
}

impl InMemoryExchangeRates {
    /// Creates a service quoting `rate` on every call.
    pub fn new(rate: f64) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryExchangeState {
                rate,
                call_count: 0,
                fail_on_rate: None,
                delay: Duration::ZERO,
            })),
        }
    }

    /// Changes the quoted rate.
    pub fn set_rate(&self, rate: f64) {
        self.state.write().unwrap().rate = rate;
    }

    /// Makes every call fail with `error` until cleared with `None`.
    pub fn set_fail_on_rate(&self, error: Option<ServiceError>) {
        self.state.write().unwrap().fail_on_rate = error;
    }

    /// Delays every call by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state.write().unwrap().delay = delay;
    }

    /// Number of calls received, including failed ones.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().call_count
    }
}

impl Default for InMemoryExchangeRates {
    fn default() -> Self {
        Self::new(5.5)
    }
}

#[async_trait]
impl ExchangeRates for InMemoryExchangeRates {
    async fn rate(&self) -> Result<RateQuote, ServiceError> {
        let delay = {
            let mut state = self.state.write().unwrap();
            state.call_count += 1;
            state.delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.read().unwrap();
        if let Some(err) = state.fail_on_rate.clone() {
            return Err(err);
        }
        Ok(RateQuote {
            exchange_rate: state.rate,
        })
    }
}
