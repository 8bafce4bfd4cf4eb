//! Retry helper for transient remote failures.
//!
//! [`with_retry`] wraps a single remote call. When the call fails with an
//! error that reports itself as transient (see [`Retryable`]), the helper
//! waits `attempt² × unit` (1, 4, 9, 16, … units) and tries again, up to
//! [`RetryPolicy::max_attempts`] attempts in total. There is no jitter and no
//! back-off cap.
//!
//! Non-transient errors are returned immediately as [`RetryError::Permanent`].
//! When every attempt fails transiently the helper returns
//! [`RetryError::Exhausted`] carrying the last error.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopping_content::retry::{with_retry, RetryError, RetryPolicy, Retryable};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("busy")]
//! struct Busy;
//!
//! impl Retryable for Busy {
//!     fn is_transient(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let policy = RetryPolicy::new(2, Duration::from_millis(1));
//! let result: Result<(), _> = with_retry(&policy, "ping", || async { Err(Busy) }).await;
//!
//! match result {
//!     Err(RetryError::Exhausted(e)) => assert_eq!(e.attempts, 2),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default back-off unit.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Classifies an error as worth retrying.
pub trait Retryable {
    /// Returns `true` if repeating the same call may succeed.
    fn is_transient(&self) -> bool;
}

/// How many times to attempt a call and how long to wait in between.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopping_content::retry::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 5);
/// assert_eq!(policy.delay_after(3), Duration::from_secs(9));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts. A value of `0` is treated as `1`.
    pub max_attempts: u32,
    /// Back-off unit; attempt `n` waits `n² × unit` before the next one.
    pub unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(max_attempts: u32, unit: Duration) -> Self {
        Self { max_attempts, unit }
    }

    /// Returns the wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.unit.saturating_mul(attempt.saturating_mul(attempt))
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Returned when every attempt failed transiently.
#[derive(Debug, Error)]
#[error("{operation} still failing after {attempts} attempt(s): {source}")]
pub struct RetryExhaustedError<E: std::error::Error + 'static> {
    /// Name of the retried operation.
    pub operation: String,
    /// Number of attempts made.
    pub attempts: u32,
    /// Error of the last attempt.
    pub source: E,
}

/// Failure of a retried call.
#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// The call failed with a non-transient error; no retry was made.
    #[error(transparent)]
    Permanent(E),

    /// The call kept failing transiently.
    #[error(transparent)]
    Exhausted(RetryExhaustedError<E>),
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// Returns the last underlying error.
    #[must_use]
    pub const fn last_error(&self) -> &E {
        match self {
            Self::Permanent(e) => e,
            Self::Exhausted(e) => &e.source,
        }
    }
}

/// Runs `operation` under `policy`.
///
/// `operation` is invoked once per attempt and must produce a fresh future
/// each time. The wait between attempts uses [`tokio::time::sleep`], so a
/// paused test clock advances it instantly.
///
/// # Errors
///
/// Returns [`RetryError::Permanent`] for the first non-transient error and
/// [`RetryError::Exhausted`] once `max_attempts` transient failures occurred.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + Retryable + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.attempts();
    let mut attempt: u32 = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_transient() => return Err(RetryError::Permanent(error)),
            Err(error) if attempt >= max_attempts => {
                tracing::warn!(
                    "Attempt {attempt} to call {operation_name} failed, giving up: {error}"
                );
                return Err(RetryError::Exhausted(RetryExhaustedError {
                    operation: operation_name.to_string(),
                    attempts: attempt,
                    source: error,
                }));
            }
            Err(error) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "Attempt {attempt} to call {operation_name} failed, retrying in {:?}: {error}",
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Runs `operation` under `policy` when one is given, and exactly once
/// otherwise.
///
/// Without a policy every error is returned as [`RetryError::Permanent`].
///
/// # Errors
///
/// See [`with_retry`].
pub async fn with_optional_retry<T, E, F, Fut>(
    policy: Option<&RetryPolicy>,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + Retryable + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match policy {
        Some(policy) => with_retry(policy, operation_name, operation).await,
        None => operation().await.map_err(RetryError::Permanent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Error, PartialEq, Eq)]
    enum FakeError {
        #[error("unavailable")]
        Unavailable,
        #[error("bad request")]
        BadRequest,
    }

    impl Retryable for FakeError {
        fn is_transient(&self) -> bool {
            matches!(self, Self::Unavailable)
        }
    }

    #[test]
    fn test_delay_is_quadratic_in_attempt() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (1..=4).map(|n| policy.delay_after(n).as_secs()).collect();
        assert_eq!(delays, vec![1, 4, 9, 16]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_transient_failures_then_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let result = with_retry(&RetryPolicy::default(), "products.get", || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(FakeError::Unavailable)
                } else {
                    Ok("product")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "product");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(1 + 4 + 9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let result: Result<(), _> = with_retry(&RetryPolicy::default(), "products.insert", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::BadRequest)
            }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Permanent(FakeError::BadRequest))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_is_reported_explicitly() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();

        let result: Result<(), _> = with_retry(&RetryPolicy::default(), "products.delete", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Unavailable)
            }
        })
        .await;

        let Err(RetryError::Exhausted(error)) = result else {
            panic!("expected exhaustion");
        };
        assert_eq!(error.attempts, 5);
        assert_eq!(error.operation, "products.delete");
        assert_eq!(error.source, FakeError::Unavailable);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        // No wait after the final attempt.
        assert_eq!(started.elapsed(), Duration::from_secs(1 + 4 + 9 + 16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_calls_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(0, Duration::from_secs(1));

        let result: Result<(), _> = with_retry(&policy, "op", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Unavailable)
            }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Exhausted(ref e)) if e.attempts == 1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_policy_transient_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = with_optional_retry(None, "accounts.get", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Unavailable)
            }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Permanent(FakeError::Unavailable))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_policy_delegates_to_retry_loop() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        let result = with_optional_retry(Some(&policy), "accounts.get", || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FakeError::Unavailable)
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_exhausted_error_message_names_operation() {
        let error = RetryExhaustedError {
            operation: "products.get".to_string(),
            attempts: 5,
            source: FakeError::Unavailable,
        };
        let message = error.to_string();
        assert!(message.contains("products.get"));
        assert!(message.contains("5 attempt"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_last_error_accessor() {
        let permanent: RetryError<FakeError> = RetryError::Permanent(FakeError::BadRequest);
        assert_eq!(permanent.last_error(), &FakeError::BadRequest);
    }
}
