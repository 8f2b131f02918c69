//! Bounded constant-delay retry for flaky marketplace calls.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// How often and how patiently a failing operation is reattempted.
///
/// `max_retries` counts re-attempts after the first failure, so an
/// operation runs at most `max_retries + 1` times. A policy with
/// `max_retries` of zero makes exactly one attempt and never sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Re-attempts allowed after the first failure.
    pub max_retries: u32,

    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given retry budget and pause.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Returns the maximum number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// A retried operation that never succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Max retries reached after {attempts} attempts: {last_error}")]
pub struct RetryError {
    /// Total attempts made, including the first.
    pub attempts: u32,

    /// Message of the last failure.
    pub last_error: String,
}

/// Receives notifications as a retried operation fails.
pub trait RetryObserver: Send + Sync {
    /// Called after failed attempt number `attempt` (1-based) when a
    /// retry will follow, before the delay is awaited.
    fn on_retry(&self, attempt: u32, error: &str, delay: Duration);

    /// Called once when the final attempt has failed and no retry follows.
    fn on_exhausted(&self, error: &str);
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {
    fn on_retry(&self, _attempt: u32, _error: &str, _delay: Duration) {}

    fn on_exhausted(&self, _error: &str) {}
}

/// Observer that logs every retry and the final exhaustion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_retry(&self, attempt: u32, error: &str, delay: Duration) {
        tracing::warn!(
            "Retry {attempt} after error: {error}. Retrying in {} seconds...",
            delay.as_secs_f64()
        );
    }

    fn on_exhausted(&self, error: &str) {
        tracing::error!("Max retries reached: {error}");
    }
}

/// Runs `operation` until it succeeds or the policy is spent.
///
/// Every failure counts against the budget; there is no filtering of
/// retryable versus fatal errors. The pause between attempts is an
/// awaited timer, so dropping the returned future cancels the whole
/// execution, pending sleep included.
pub async fn execute<T, E, F, Fut>(
    policy: RetryPolicy,
    observer: &dyn RetryObserver,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let error = error.to_string();
                if attempt <= policy.max_retries {
                    observer.on_retry(attempt, &error, policy.delay);
                    tokio::time::sleep(policy.delay).await;
                } else {
                    observer.on_exhausted(&error);
                    return Err(RetryError {
                        attempts: attempt,
                        last_error: error,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Records every notification for later assertions.
    #[derive(Debug, Default)]
    struct RecordingObserver {
        retries: Mutex<Vec<(u32, String, Duration)>>,
        exhaustions: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn retries(&self) -> Vec<(u32, String, Duration)> {
            self.retries.lock().unwrap().clone()
        }

        fn exhaustions(&self) -> Vec<String> {
            self.exhaustions.lock().unwrap().clone()
        }
    }

    impl RetryObserver for RecordingObserver {
        fn on_retry(&self, attempt: u32, error: &str, delay: Duration) {
            self.retries
                .lock()
                .unwrap()
                .push((attempt, error.to_string(), delay));
        }

        fn on_exhausted(&self, error: &str) {
            self.exhaustions.lock().unwrap().push(error.to_string());
        }
    }

    /// Fails the first `failures` calls, then succeeds with the call number.
    async fn flaky(calls: &AtomicU32, failures: u32) -> Result<u32, String> {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= failures {
            Err(format!("boom {call}"))
        } else {
            Ok(call)
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_makes_one_call() {
        let calls = AtomicU32::new(0);
        let observer = RecordingObserver::default();
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = execute(policy, &observer, || flaky(&calls, 0)).await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(observer.retries().is_empty());
        assert!(observer.exhaustions().is_empty());
    }

    #[tokio::test]
    async fn test_recovers_after_failures() {
        let calls = AtomicU32::new(0);
        let observer = RecordingObserver::default();
        let policy = RetryPolicy::new(3, Duration::from_millis(1));

        let result = execute(policy, &observer, || flaky(&calls, 2)).await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            observer.retries(),
            vec![
                (1, "boom 1".to_string(), Duration::from_millis(1)),
                (2, "boom 2".to_string(), Duration::from_millis(1)),
            ]
        );
        assert!(observer.exhaustions().is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_after_max_retries() {
        let calls = AtomicU32::new(0);
        let observer = RecordingObserver::default();
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<u32, RetryError> =
            execute(policy, &observer, || flaky(&calls, u32::MAX)).await;

        assert_eq!(
            result,
            Err(RetryError {
                attempts: 4,
                last_error: "boom 4".to_string(),
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(observer.retries().len(), 3);
        assert_eq!(observer.exhaustions(), vec!["boom 4".to_string()]);
    }

    #[tokio::test]
    async fn test_zero_max_retries_makes_single_attempt() {
        let calls = AtomicU32::new(0);
        let observer = RecordingObserver::default();
        let policy = RetryPolicy::new(0, Duration::from_secs(2));

        let result: Result<u32, RetryError> =
            execute(policy, &observer, || flaky(&calls, u32::MAX)).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(observer.retries().is_empty());
        assert_eq!(observer.exhaustions().len(), 1);
    }

    #[tokio::test]
    async fn test_noop_observer_still_retries() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(1, Duration::ZERO);

        let result: Result<u32, RetryError> =
            execute(policy, &NoopObserver, || flaky(&calls, u32::MAX)).await;

        assert_eq!(
            result,
            Err(RetryError {
                attempts: 2,
                last_error: "boom 2".to_string(),
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_success_on_final_attempt_is_not_exhaustion() {
        let calls = AtomicU32::new(0);
        let observer = RecordingObserver::default();
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = execute(policy, &observer, || flaky(&calls, 3)).await;

        assert_eq!(result, Ok(4));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(observer.retries().len(), 3);
        assert!(observer.exhaustions().is_empty());
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn test_retry_error_display() {
        let err = RetryError {
            attempts: 4,
            last_error: "Marketplace B inventory creation failed: Name is required".to_string(),
        };
        assert!(err.to_string().starts_with("Max retries reached"));
        assert!(err.to_string().contains("Name is required"));
    }
}
