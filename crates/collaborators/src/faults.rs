//! Random latency and server errors for simulator endpoints.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// How often and how badly an endpoint misbehaves.
///
/// Probabilities are clamped to `0.0..=1.0`. A zero probability disables the
/// corresponding fault.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultProfile {
    /// Chance that a request is held back before being answered.
    pub delay_probability: f64,
    /// Longest hold-back; the actual delay is uniform in `0..=max_delay`.
    pub max_delay: Duration,
    /// Chance that a single request fails on its own.
    pub error_probability: f64,
    /// Chance that a request opens a failure window.
    pub window_probability: f64,
    /// How long every request fails once a window is open.
    pub window_duration: Duration,
}

impl Default for FaultProfile {
    fn default() -> Self {
        Self::none()
    }
}

impl FaultProfile {
    /// Never injects anything.
    pub fn none() -> Self {
        Self {
            delay_probability: 0.0,
            max_delay: Duration::ZERO,
            error_probability: 0.0,
            window_probability: 0.0,
            window_duration: Duration::ZERO,
        }
    }

    /// Holds back a fraction of requests for up to `max_delay`.
    pub fn with_delay(mut self, probability: f64, max_delay: Duration) -> Self {
        self.delay_probability = probability.clamp(0.0, 1.0);
        self.max_delay = max_delay;
        self
    }

    /// Fails a fraction of requests independently of each other.
    pub fn with_errors(mut self, probability: f64) -> Self {
        self.error_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Fails every request for `duration` after a randomly triggered failure.
    pub fn with_failure_window(mut self, probability: f64, duration: Duration) -> Self {
        self.window_probability = probability.clamp(0.0, 1.0);
        self.window_duration = duration;
        self
    }

    /// Returns true if any fault can be injected.
    pub fn is_faulty(&self) -> bool {
        self.delay_probability > 0.0
            || self.error_probability > 0.0
            || self.window_probability > 0.0
    }
}

/// A 500 response produced on purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFault {
    pub detail: String,
}

impl IntoResponse for InjectedFault {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

struct Roll {
    delay: Option<Duration>,
    error: bool,
    open_window: bool,
}

/// Applies a [`FaultProfile`] to one endpoint.
///
/// Call [`FaultInjector::inject`] at the top of the handler and return early
/// on `Err`. The open failure window is the only state kept between requests.
pub struct FaultInjector {
    endpoint: &'static str,
    detail: String,
    profile: FaultProfile,
    window_until: Mutex<Option<Instant>>,
}

impl FaultInjector {
    /// Creates an injector whose failures answer with `detail`.
    pub fn new(endpoint: &'static str, detail: impl Into<String>, profile: FaultProfile) -> Self {
        Self {
            endpoint,
            detail: detail.into(),
            profile,
            window_until: Mutex::new(None),
        }
    }

    /// Creates an injector that never interferes.
    pub fn disabled(endpoint: &'static str) -> Self {
        Self::new(endpoint, "", FaultProfile::none())
    }

    /// Sleeps and/or fails according to the profile.
    pub async fn inject(&self) -> Result<(), InjectedFault> {
        if !self.profile.is_faulty() {
            return Ok(());
        }

        let now = Instant::now();
        {
            let window = self.window_until.lock().await;
            if let Some(until) = *window {
                if now < until {
                    tracing::warn!(endpoint = self.endpoint, "failure window open, rejecting");
                    return Err(self.fault());
                }
            }
        }

        let roll = self.roll();

        if let Some(delay) = roll.delay {
            tracing::info!(
                endpoint = self.endpoint,
                delay_ms = delay.as_millis() as u64,
                "injecting delay"
            );
            tokio::time::sleep(delay).await;
        }

        if roll.open_window {
            let until = Instant::now() + self.profile.window_duration;
            *self.window_until.lock().await = Some(until);
            tracing::warn!(
                endpoint = self.endpoint,
                window_ms = self.profile.window_duration.as_millis() as u64,
                "failure window opened"
            );
            return Err(self.fault());
        }

        if roll.error {
            tracing::warn!(endpoint = self.endpoint, "injecting server error");
            return Err(self.fault());
        }

        Ok(())
    }

    // ThreadRng is not Send, so every draw happens here, away from any await.
    fn roll(&self) -> Roll {
        let mut rng = rand::rng();
        let p = &self.profile;

        let delayed = p.delay_probability > 0.0 && rng.random_bool(p.delay_probability);
        let delay = delayed.then(|| {
            let max_ms = p.max_delay.as_millis() as u64;
            Duration::from_millis(rng.random_range(0..=max_ms))
        });

        Roll {
            delay,
            error: p.error_probability > 0.0 && rng.random_bool(p.error_probability),
            open_window: p.window_probability > 0.0 && rng.random_bool(p.window_probability),
        }
    }

    fn fault(&self) -> InjectedFault {
        InjectedFault {
            detail: self.detail.clone(),
        }
    }
}
