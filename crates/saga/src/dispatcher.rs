//! Best-effort, single-attempt invocation.

use std::future::Future;
use std::time::Duration;

use crate::error::ServiceError;

/// Result of a best-effort dispatch. Never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome<T> {
    /// The call completed successfully within its deadline.
    Delivered(T),
    /// The call failed or timed out; the reason is kept for logging only.
    NotDelivered(String),
}

/// Invokes a call once and swallows any failure.
///
/// The caller waits at most `timeout`; a call still in flight at the deadline
/// is dropped.
#[derive(Debug, Clone, Copy)]
pub struct FireAndForget {
    name: &'static str,
}

impl FireAndForget {
    /// Creates a dispatcher labelled `name` in logs and metrics.
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Awaits `call` for at most `timeout`; any failure becomes `NotDelivered`.
    pub async fn dispatch<T, Fut>(&self, call: Fut, timeout: Duration) -> DispatchOutcome<T>
    where
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let reason = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(value)) => return DispatchOutcome::Delivered(value),
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("no response within {timeout:?}"),
        };

        metrics::counter!("fire_and_forget_dropped_total", "call" => self.name).increment(1);
        tracing::warn!(call = self.name, %reason, "best-effort call dropped");
        DispatchOutcome::NotDelivered(reason)
    }
}
