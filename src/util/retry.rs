//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::TravelError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Execute an async operation, retrying errors that are retryable.
    ///
    /// A rate-limit error carrying a retry-after hint waits at least that long.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, TravelError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TravelError>>,
    {
        let mut backoff = self.initial_backoff;
        let max_attempts = self.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() || attempt >= max_attempts => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "Retrying after error"
                    );

                    // Jitter: 75%-125% of backoff
                    let jitter_factor = 0.75 + (rand_factor() * 0.5);
                    let mut sleep_duration =
                        Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);
                    if let TravelError::RateLimited {
                        retry_after_ms: Some(ms),
                    } = &e
                    {
                        sleep_duration = sleep_duration.max(Duration::from_millis(*ms));
                    }
                    tokio::time::sleep(sleep_duration.min(self.max_backoff)).await;

                    backoff = Duration::from_secs_f64(
                        (backoff.as_secs_f64() * self.multiplier)
                            .min(self.max_backoff.as_secs_f64()),
                    );
                }
            }
        }

        unreachable!("retry loop always returns on the final attempt")
    }
}

/// Pseudo-random factor in [0, 1) from the clock and thread id.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    (hasher.finish() % 10_000) as f64 / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            multiplier: 1.0,
        }
    }

    #[tokio::test]
    async fn retries_server_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = fast(3)
            .execute(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(TravelError::api(503, "busy"))
                } else {
                    Ok("ok")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast(5)
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TravelError::Authentication("bad key".into()))
            })
            .await;

        assert!(matches!(result, Err(TravelError::Authentication(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast(2)
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TravelError::api(500, "boom"))
            })
            .await;

        assert!(matches!(result, Err(TravelError::Api { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
