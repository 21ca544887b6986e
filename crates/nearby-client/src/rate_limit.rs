//! Retry with exponential backoff for transient HTTP failures.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Returns `true` if `err` is transient and worth retrying after a delay.
///
/// Retriable: 429 ([`FetchError::RateLimited`]), 5xx
/// ([`FetchError::UnexpectedStatus`] with `status >= 500`), and network-level
/// failures ([`FetchError::Http`]). Everything else is returned immediately.
fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::RateLimited { .. } | FetchError::Http(_) => true,
        FetchError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds.
/// With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> FetchError {
        FetchError::RateLimited {
            url: "http://catalog.test/businesses".to_owned(),
            retry_after_secs: 0,
        }
    }

    async fn run_counting(
        max_retries: u32,
        mut outcome: impl FnMut(u32) -> Result<u32, FetchError>,
    ) -> (Result<u32, FetchError>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result = retry_with_backoff(max_retries, 0, || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let out = outcome(n);
            async move { out }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn zero_retries_runs_once() {
        let (result, calls) = run_counting(0, |_| Err(rate_limited())).await;
        assert!(matches!(result, Err(FetchError::RateLimited { .. })));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retries_rate_limit_then_succeeds() {
        let (result, calls) =
            run_counting(3, |n| if n < 2 { Err(rate_limited()) } else { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn retries_server_errors() {
        let (result, calls) = run_counting(1, |_| {
            Err(FetchError::UnexpectedStatus {
                status: 503,
                url: "u".to_owned(),
            })
        })
        .await;
        assert!(matches!(
            result,
            Err(FetchError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(calls, 2, "max_retries=1 means two attempts");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (result, calls) = run_counting(3, |_| {
            Err(FetchError::UnexpectedStatus {
                status: 403,
                url: "u".to_owned(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn deserialize_errors_are_not_retried() {
        let (result, calls) = run_counting(3, |_| {
            let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
            Err(FetchError::Deserialize {
                context: "test".to_owned(),
                source,
            })
        })
        .await;
        assert!(matches!(result, Err(FetchError::Deserialize { .. })));
        assert_eq!(calls, 1);
    }
}
