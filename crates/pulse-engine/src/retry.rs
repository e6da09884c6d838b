//! Retry with exponential back-off and jitter for signal-source fetches.
//!
//! Only transient failures (timeouts, connection errors, 5xx and 429
//! responses) are retried. Decode failures and an open circuit are returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::IngestionError;

const MAX_DELAY: Duration = Duration::from_secs(30);

/// How many extra attempts a source gets and how long it waits between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Un-jittered wait before retry number `retry` (1-based): the base
    /// doubled per retry, capped at 30 s.
    fn base_delay(self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(10);
        Duration::from_millis(self.backoff_base_ms)
            .saturating_mul(factor)
            .min(MAX_DELAY)
    }

    /// [`Self::base_delay`] scaled by a random factor in `0.75..=1.25`.
    fn delay(self, retry: u32) -> Duration {
        self.base_delay(retry)
            .mul_f64(rand::random_range(0.75..=1.25))
    }
}

/// Returns `true` for errors worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &IngestionError) -> bool {
    match err {
        IngestionError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.is_request()
                || e.status().is_some_and(|s| s.is_server_error())
        }
        IngestionError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
        IngestionError::Decode { .. }
        | IngestionError::CircuitOpen { .. }
        | IngestionError::InvalidSource(_) => false,
    }
}

/// Runs `operation` until it succeeds, fails permanently, or `policy`
/// runs out of retries. The last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    source_name: &str,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, IngestionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, IngestionError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry >= policy.max_retries || !is_retriable(&err) {
            return Err(err);
        }

        retry += 1;
        let delay = policy.delay(retry);
        tracing::warn!(
            source = source_name,
            retry,
            max_retries = policy.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient source error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff_base_ms: 0,
        }
    }

    fn status(code: u16) -> IngestionError {
        IngestionError::UnexpectedStatus {
            source_name: "feed".to_owned(),
            status: code,
        }
    }

    #[test]
    fn server_errors_and_throttling_are_retriable() {
        assert!(is_retriable(&status(503)));
        assert!(is_retriable(&status(429)));
        assert!(!is_retriable(&status(404)));
    }

    #[test]
    fn decode_and_open_circuit_are_not_retriable() {
        assert!(!is_retriable(&IngestionError::Decode {
            source_name: "feed".to_owned(),
            reason: "bad json".to_owned(),
        }));
        assert!(!is_retriable(&IngestionError::CircuitOpen {
            source_name: "feed".to_owned(),
        }));
    }

    #[test]
    fn delay_doubles_per_retry_and_is_capped() {
        let p = RetryPolicy {
            max_retries: 5,
            backoff_base_ms: 100,
        };
        assert_eq!(p.base_delay(1), Duration::from_millis(100));
        assert_eq!(p.base_delay(3), Duration::from_millis(400));
        assert_eq!(p.base_delay(40), MAX_DELAY);
    }

    #[test]
    fn jitter_stays_within_a_quarter() {
        let p = RetryPolicy {
            max_retries: 5,
            backoff_base_ms: 400,
        };
        for _ in 0..100 {
            let d = p.delay(1);
            assert!(d >= Duration::from_millis(300) && d <= Duration::from_millis(500));
        }
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff("feed", policy(3), || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(status(502))
                } else {
                    Ok(7u32)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff("feed", policy(2), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status(500))
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(IngestionError::UnexpectedStatus { status: 500, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "1 attempt + 2 retries");
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff("feed", policy(3), || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status(403))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
