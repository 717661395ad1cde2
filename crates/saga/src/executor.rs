//! Resilient call executor: retry with exponential backoff and a per-attempt
//! deadline around a single remote call.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::error::ServiceError;
use crate::outcome::CallOutcome;

/// Decides whether a failed attempt may be retried.
pub type RetryPredicate = fn(&ServiceError) -> bool;

/// Attempt budget, backoff schedule and per-attempt deadline.
///
/// The delay after failed attempt `n` is
/// `min(ceiling, max(floor, base) * 2^(n-1))`, without jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each later attempt.
    pub backoff_base: Duration,
    /// Lower bound for the first delay.
    pub backoff_floor: Duration,
    /// Upper bound for any delay.
    pub backoff_ceiling: Duration,
    /// Deadline applied to each attempt separately.
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// One attempt, no retry.
    pub fn single_attempt(attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            backoff_base: Duration::ZERO,
            backoff_floor: Duration::ZERO,
            backoff_ceiling: Duration::ZERO,
            attempt_timeout,
        }
    }

    /// Exponential backoff starting at `base` and capped at `ceiling`.
    pub fn exponential(
        max_attempts: u32,
        base: Duration,
        ceiling: Duration,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            max_attempts,
            backoff_base: base,
            backoff_floor: base,
            backoff_ceiling: ceiling,
            attempt_timeout,
        }
    }

    /// Sets the lower bound for the first backoff delay.
    pub fn with_backoff_floor(mut self, floor: Duration) -> Self {
        self.backoff_floor = floor;
        self
    }

    /// Backoff schedule between attempts.
    pub fn backoff(&self) -> ExponentialBuilder {
        let retries = self.max_attempts.max(1) - 1;
        ExponentialBuilder::default()
            .with_min_delay(self.backoff_base.max(self.backoff_floor))
            .with_max_delay(self.backoff_ceiling)
            .with_max_times(retries as usize)
    }
}

/// A named retry policy that wraps remote calls.
///
/// `execute` takes a call factory rather than a future so that every attempt
/// issues a fresh request. The last outcome is surfaced as-is once the
/// attempts are exhausted; choosing a fallback is the caller's job.
#[derive(Debug, Clone)]
pub struct ResilientCall {
    name: &'static str,
    policy: RetryPolicy,
    retryable: RetryPredicate,
}

impl ResilientCall {
    /// Creates an executor that retries connection failures, timeouts and 5xx.
    pub fn new(name: &'static str, policy: RetryPolicy) -> Self {
        Self {
            name,
            policy,
            retryable: ServiceError::is_retryable,
        }
    }

    /// Replaces the retryable-error predicate.
    pub fn with_predicate(mut self, retryable: RetryPredicate) -> Self {
        self.retryable = retryable;
        self
    }

    /// Runs `call` until it succeeds, fails fatally, or the attempts run out.
    ///
    /// An attempt that outlives `attempt_timeout` counts as
    /// [`ServiceError::Timeout`] and surfaces as `DeadlineExceeded`.
    pub async fn execute<T, F, Fut>(&self, mut call: F) -> CallOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let attempt_timeout = self.policy.attempt_timeout;
        let attempts = AtomicU32::new(0);

        let result = (|| {
            attempts.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("resilient_call_attempts_total", "call" => self.name).increment(1);
            let attempt = call();
            async move {
                tokio::time::timeout(attempt_timeout, attempt)
                    .await
                    .unwrap_or(Err(ServiceError::Timeout))
            }
        })
        .retry(self.policy.backoff())
        .sleep(tokio::time::sleep)
        .when(|err| (self.retryable)(err))
        .notify(|err, delay| {
            tracing::info!(
                call = self.name,
                attempt = attempts.load(Ordering::Relaxed),
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                reason = %err,
                "attempt failed, backing off"
            );
        })
        .await;

        let err = match result {
            Ok(value) => return CallOutcome::Success(value),
            Err(err) => err,
        };

        let outcome = match err {
            ServiceError::Timeout => CallOutcome::DeadlineExceeded,
            err if (self.retryable)(&err) => CallOutcome::RetryableFailure(err.to_string()),
            err => CallOutcome::FatalFailure(err.to_string()),
        };
        tracing::warn!(
            call = self.name,
            attempt = attempts.load(Ordering::Relaxed),
            max_attempts,
            outcome = outcome.label(),
            reason = %outcome.failure_reason().unwrap_or_default(),
            "call failed, giving up"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backon::BackoffBuilder;
    use std::sync::Arc;

    fn lookup_policy() -> RetryPolicy {
        RetryPolicy::exponential(
            3,
            Duration::from_secs(2),
            Duration::from_secs(10),
            Duration::from_secs(10),
        )
    }

    fn schedule(policy: &RetryPolicy) -> Vec<Duration> {
        policy.backoff().build().collect()
    }

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(
            schedule(&lookup_policy()),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );

        let long = RetryPolicy::exponential(
            6,
            Duration::from_secs(2),
            Duration::from_secs(10),
            Duration::from_secs(10),
        );
        assert_eq!(
            schedule(&long),
            [2, 4, 8, 10, 10].map(Duration::from_secs).to_vec()
        );
    }

    #[test]
    fn test_single_attempt_never_waits() {
        assert!(schedule(&RetryPolicy::single_attempt(Duration::from_secs(2))).is_empty());
    }

    #[test]
    fn test_backoff_floor() {
        let policy = RetryPolicy::exponential(
            3,
            Duration::from_millis(100),
            Duration::from_secs(10),
            Duration::from_secs(1),
        )
        .with_backoff_floor(Duration::from_millis(500));
        assert_eq!(
            schedule(&policy),
            vec![Duration::from_millis(500), Duration::from_secs(1)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = ResilientCall::new("test", lookup_policy());
        let started = tokio::time::Instant::now();

        let outcome = executor
            .execute(|| {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(ServiceError::server_error("busy"))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(outcome, CallOutcome::Success(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 2s after the first failure, 4s after the second.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_surfaces_last_outcome_after_exhaustion() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = ResilientCall::new("test", lookup_policy());

        let outcome: CallOutcome<()> = executor
            .execute(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ServiceError::Connection("refused".into()))
                }
            })
            .await;

        assert_eq!(
            outcome,
            CallOutcome::RetryableFailure("connection failed: refused".into())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = ResilientCall::new("test", lookup_policy());

        let outcome: CallOutcome<()> = executor
            .execute(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ServiceError::Status {
                        status: 404,
                        body: "no such flight".into(),
                    })
                }
            })
            .await;

        assert!(matches!(outcome, CallOutcome::FatalFailure(ref r) if r.contains("404")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_deadline() {
        let executor =
            ResilientCall::new("test", RetryPolicy::single_attempt(Duration::from_secs(2)));
        let started = tokio::time::Instant::now();

        let outcome = executor
            .execute(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, ServiceError>(1)
            })
            .await;

        assert_eq!(outcome, CallOutcome::DeadlineExceeded);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = ResilientCall::new(
            "test",
            RetryPolicy::exponential(
                2,
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_secs(3),
            ),
        );

        let outcome = executor
            .execute(|| {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    Ok::<_, ServiceError>("late")
                }
            })
            .await;

        assert_eq!(outcome, CallOutcome::Success("late"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_predicate() {
        let calls = Arc::new(AtomicU32::new(0));
        let executor = ResilientCall::new("test", lookup_policy()).with_predicate(|_| false);

        let outcome: CallOutcome<()> = executor
            .execute(|| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ServiceError::server_error("busy"))
                }
            })
            .await;

        assert!(matches!(outcome, CallOutcome::FatalFailure(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
