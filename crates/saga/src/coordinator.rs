//! Saga coordinator for the four-step ticket purchase.

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::SellReceipt;

use crate::config::SagaConfig;
use crate::dispatcher::{DispatchOutcome, FireAndForget};
use crate::error::{Result, SagaError};
use crate::executor::{ResilientCall, RetryPolicy};
use crate::fallback::FallbackState;
use crate::history::round_to;
use crate::outcome::CallOutcome;
use crate::purchase::{PurchaseRequest, PurchaseResult};
use crate::services::{ExchangeRates, FlightCatalog, LoyaltyProgram, airlines, exchange, fidelity};
use crate::step::PurchaseStep;

/// Orchestrates ticket purchases across the catalog, exchange and fidelity
/// services.
///
/// The saga runs lookup flight → quote rate → sell ticket → credit bonus in
/// sequence, each step with its own policy. There are no compensating
/// actions: once the sale is committed, a failed bonus credit either fails
/// the saga (strict mode) or is reported as zero points (fault-tolerant mode).
pub struct PurchaseCoordinator<C, X, L>
where
    C: FlightCatalog,
    X: ExchangeRates,
    L: LoyaltyProgram,
{
    catalog: C,
    exchange: X,
    loyalty: L,
    fallback: Arc<FallbackState>,
    config: SagaConfig,
    flight_lookup: ResilientCall,
    rate_quote: ResilientCall,
    bonus_dispatcher: FireAndForget,
}

impl<C, X, L> PurchaseCoordinator<C, X, L>
where
    C: FlightCatalog,
    X: ExchangeRates,
    L: LoyaltyProgram,
{
    /// Creates a coordinator with the default step policies.
    pub fn new(catalog: C, exchange: X, loyalty: L, fallback: Arc<FallbackState>) -> Self {
        Self::with_config(catalog, exchange, loyalty, fallback, SagaConfig::default())
    }

    /// Creates a coordinator with explicit step policies.
    pub fn with_config(
        catalog: C,
        exchange: X,
        loyalty: L,
        fallback: Arc<FallbackState>,
        config: SagaConfig,
    ) -> Self {
        let flight_lookup = ResilientCall::new("airlines-hub.flight", config.flight_lookup);
        let rate_quote = ResilientCall::new(
            "exchange.convert",
            RetryPolicy::single_attempt(config.rate_timeout),
        );
        Self {
            catalog,
            exchange,
            loyalty,
            fallback,
            config,
            flight_lookup,
            rate_quote,
            bonus_dispatcher: FireAndForget::new("fidelity.bonus"),
        }
    }

    /// Returns the shared price cache and rate history.
    pub fn fallback_state(&self) -> &Arc<FallbackState> {
        &self.fallback
    }

    /// Returns the step policies in use.
    pub fn config(&self) -> &SagaConfig {
        &self.config
    }

    /// Runs the purchase saga and returns its single result.
    ///
    /// Fails only when a step is fatal for the request's mode; degraded
    /// outcomes still return `success = true`.
    #[tracing::instrument(
        skip(self, request),
        fields(
            flight = %request.flight,
            day = %request.day,
            user = %request.user,
            fault_tolerant = request.fault_tolerant
        )
    )]
    pub async fn purchase_ticket(&self, request: PurchaseRequest) -> Result<PurchaseResult> {
        metrics::counter!("purchase_sagas_total").increment(1);
        let saga_start = Instant::now();

        let result = self.run(&request).await;

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("purchase_saga_duration_seconds").record(duration);
        match &result {
            Ok(purchase) => {
                metrics::counter!("purchase_sagas_completed").increment(1);
                tracing::info!(
                    transaction_id = purchase.transaction_id.as_deref().unwrap_or_default(),
                    duration,
                    "purchase completed"
                );
            }
            Err(err) => {
                metrics::counter!("purchase_sagas_failed", "reason" => err.classification())
                    .increment(1);
                tracing::warn!(error = %err, duration, "purchase failed");
            }
        }

        result
    }

    async fn run(&self, request: &PurchaseRequest) -> Result<PurchaseResult> {
        request.validate()?;

        let value_usd = self.lookup_flight_value(request).await?;
        let rate = self.quote_rate(request.fault_tolerant).await?;

        let value_local = value_usd * rate;
        if !value_local.is_finite() {
            return Err(SagaError::Internal(format!(
                "local value of {value_usd} USD at rate {rate} is not a finite number"
            )));
        }
        let bonus = bonus_points(value_usd)?;
        tracing::info!(value_usd, rate, value_local, bonus, "purchase priced");

        let receipt = self.sell_ticket(request).await?;
        let credited = self.credit_bonus(request, bonus).await?;

        Ok(PurchaseResult::completed(
            receipt.transaction_id,
            value_usd,
            round_to(value_local, 2),
            credited,
        ))
    }

    /// Step 1: retried lookup, falling back to the cached or default price.
    async fn lookup_flight_value(&self, request: &PurchaseRequest) -> Result<f64> {
        let step = PurchaseStep::LookupFlight;
        tracing::info!(%step, "saga step started");

        let outcome = self
            .flight_lookup
            .execute(|| self.catalog.flight(&request.flight, &request.day))
            .await;

        match outcome {
            CallOutcome::Success(quote) => {
                self.fallback
                    .flight_values
                    .put(&request.flight, &request.day, quote.value)
                    .await;
                Ok(quote.value)
            }
            failed if request.fault_tolerant => {
                let (value, source) = match self
                    .fallback
                    .flight_values
                    .get(&request.flight, &request.day)
                    .await
                {
                    Some(cached) => (cached, "cache"),
                    None => (self.config.default_flight_value, "default"),
                };
                record_fallback(
                    step,
                    source,
                    &failure_detail(&failed, self.config.flight_lookup.attempt_timeout),
                );
                Ok(value)
            }
            failed => Err(upstream(
                step,
                airlines::SERVICE_NAME,
                &failed,
                self.config.flight_lookup.attempt_timeout,
            )),
        }
    }

    /// Step 2: single attempt, falling back to the rate history average.
    async fn quote_rate(&self, fault_tolerant: bool) -> Result<f64> {
        let step = PurchaseStep::QuoteRate;
        tracing::info!(%step, "saga step started");

        let outcome = self.rate_quote.execute(|| self.exchange.rate()).await;

        match outcome {
            CallOutcome::Success(quote) => {
                self.fallback.rates.push(quote.exchange_rate).await;
                Ok(quote.exchange_rate)
            }
            failed if fault_tolerant => {
                let average = self.fallback.rates.average().await;
                record_fallback(
                    step,
                    "history_average",
                    &failure_detail(&failed, self.config.rate_timeout),
                );
                Ok(average)
            }
            failed => Err(upstream(
                step,
                exchange::SERVICE_NAME,
                &failed,
                self.config.rate_timeout,
            )),
        }
    }

    /// Step 3: the commit. One attempt, no fallback.
    async fn sell_ticket(&self, request: &PurchaseRequest) -> Result<SellReceipt> {
        let step = PurchaseStep::SellTicket;
        tracing::info!(%step, "saga step started");

        let timeout = self.config.sell_timeout_for(request.fault_tolerant);
        let outcome = ResilientCall::new("airlines-hub.sell", RetryPolicy::single_attempt(timeout))
            .execute(|| self.catalog.sell(&request.flight, &request.day))
            .await;

        match outcome {
            CallOutcome::Success(receipt) => {
                tracing::info!(%step, transaction_id = %receipt.transaction_id, "ticket sold");
                Ok(receipt)
            }
            CallOutcome::DeadlineExceeded => Err(SagaError::DeadlineExceeded {
                step,
                service: airlines::SERVICE_NAME,
                timeout,
            }),
            failed => Err(upstream(step, airlines::SERVICE_NAME, &failed, timeout)),
        }
    }

    /// Step 4: strict mode waits for the credit; fault-tolerant mode
    /// dispatches it best-effort and reports zero points on failure.
    async fn credit_bonus(&self, request: &PurchaseRequest, bonus: i64) -> Result<i64> {
        let step = PurchaseStep::CreditBonus;
        tracing::info!(%step, bonus, "saga step started");

        let timeout = self.config.bonus_timeout_for(request.fault_tolerant);

        if request.fault_tolerant {
            let outcome = self
                .bonus_dispatcher
                .dispatch(self.loyalty.credit_bonus(&request.user, bonus), timeout)
                .await;
            return Ok(match outcome {
                DispatchOutcome::Delivered(receipt) if receipt.is_success() => bonus,
                DispatchOutcome::Delivered(receipt) => {
                    record_fallback(step, "not_credited", &receipt.message);
                    0
                }
                DispatchOutcome::NotDelivered(reason) => {
                    record_fallback(step, "not_credited", &reason);
                    0
                }
            });
        }

        let outcome = ResilientCall::new("fidelity.bonus", RetryPolicy::single_attempt(timeout))
            .execute(|| self.loyalty.credit_bonus(&request.user, bonus))
            .await;

        match outcome {
            CallOutcome::Success(receipt) if receipt.is_success() => Ok(bonus),
            CallOutcome::Success(receipt) => Err(SagaError::Upstream {
                step,
                service: fidelity::SERVICE_NAME,
                reason: format!("bonus rejected: {}", receipt.message),
            }),
            failed => Err(upstream(step, fidelity::SERVICE_NAME, &failed, timeout)),
        }
    }
}

/// Loyalty points for a purchase: the dollar value rounded half to even.
pub fn bonus_points(value_usd: f64) -> Result<i64> {
    let rounded = value_usd.round_ties_even();
    if !rounded.is_finite() || rounded.abs() >= i64::MAX as f64 {
        return Err(SagaError::Internal(format!(
            "bonus for {value_usd} USD does not fit in an integer"
        )));
    }
    Ok(rounded as i64)
}

fn failure_detail<T>(outcome: &CallOutcome<T>, timeout: Duration) -> String {
    match outcome {
        CallOutcome::DeadlineExceeded => format!("no response within {timeout:?}"),
        other => other.failure_reason().unwrap_or_default(),
    }
}

fn upstream<T>(
    step: PurchaseStep,
    service: &'static str,
    outcome: &CallOutcome<T>,
    timeout: Duration,
) -> SagaError {
    SagaError::Upstream {
        step,
        service,
        reason: failure_detail(outcome, timeout),
    }
}

fn record_fallback(step: PurchaseStep, source: &'static str, reason: &str) {
    metrics::counter!(
        "purchase_fallbacks_total",
        "step" => step.as_str(),
        "source" => source
    )
    .increment(1);
    tracing::warn!(%step, source, reason, "step failed, using fallback");
}
