//! Outcome of a guarded call to a collaborator.

/// What a guarded call produced, classified for fallback decisions.
///
/// The coordinator inspects this value to pick a fallback or fail the saga;
/// failures never travel as `Err` through the step logic.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    /// The collaborator answered successfully.
    Success(T),

    /// The last attempt failed with a transient error (connection, 5xx).
    RetryableFailure(String),

    /// The last attempt failed with an error that retrying cannot fix (4xx,
    /// unreadable body).
    FatalFailure(String),

    /// The last attempt did not finish before its deadline.
    DeadlineExceeded,
}

impl<T> CallOutcome<T> {
    /// Human-readable reason for a failed outcome.
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            CallOutcome::Success(_) => None,
            CallOutcome::RetryableFailure(reason) | CallOutcome::FatalFailure(reason) => {
                Some(reason.clone())
            }
            CallOutcome::DeadlineExceeded => Some("deadline exceeded".to_string()),
        }
    }

    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            CallOutcome::Success(_) => "success",
            CallOutcome::RetryableFailure(_) => "retryable_failure",
            CallOutcome::FatalFailure(_) => "fatal_failure",
            CallOutcome::DeadlineExceeded => "deadline_exceeded",
        }
    }
}
