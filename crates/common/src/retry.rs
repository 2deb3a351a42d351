//! Fixed-delay retry used while bootstrapping external dependencies
//! (the database is usually not ready when the container starts).

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first try; zero is treated as one.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(10, Duration::from_secs(2))
    }
}

/// Run `operation` until it succeeds or the policy runs out of attempts.
/// The error of the last attempt is returned.
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retries");
                }
                return Ok(value);
            }
            Err(error) if attempt >= policy.max_attempts => {
                warn!(attempt, error = %error, "giving up after last attempt");
                return Err(error);
            }
            Err(error) => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    retry_in_ms = policy.delay.as_millis() as u64,
                    error = %error,
                    "operation failed, retrying"
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_first_try() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();

        let result = retry_with_policy(&policy, || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<i32, String>(42)
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_after_retries() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1));
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();

        let result = retry_with_policy(&policy, || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("db not ready".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_at_max_attempts_and_returns_last_error() {
        let policy = RetryPolicy::fixed(4, Duration::from_millis(1));
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();

        let result: Result<(), String> = retry_with_policy(&policy, || {
            let c = c.clone();
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                Err(format!("attempt {n} failed"))
            }
        })
        .await;

        assert_eq!(result, Err("attempt 4 failed".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn zero_attempts_means_one() {
        let policy = RetryPolicy::fixed(0, Duration::from_secs(2));
        assert_eq!(policy.max_attempts(), 1);
        let default = RetryPolicy::default();
        assert_eq!(default.max_attempts(), 10);
        assert_eq!(default.delay(), Duration::from_secs(2));
    }
}
