//! Bounded retry for serialization failures and deadlocks

use std::future::Future;
use std::time::Duration;

use tracing::warn;

pub const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(20);

/// Run `attempt` until it succeeds, fails with an error `retryable` rejects,
/// or [`MAX_ATTEMPTS`] is reached. The last error is returned as is.
pub async fn with_retry<T, F, Fut>(
    operation: &str,
    retryable: fn(&sqlx::Error) -> bool,
    mut attempt: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut n = 1;
    loop {
        match attempt().await {
            Err(e) if n < MAX_ATTEMPTS && retryable(&e) => {
                let backoff = BASE_BACKOFF * 2u32.pow(n - 1);
                warn!(
                    attempt = n,
                    backoff_ms = backoff.as_millis() as u64,
                    "Retrying {} after: {}",
                    operation,
                    e
                );
                tokio::time::sleep(backoff).await;
                n += 1;
            }
            result => return result,
        }
    }
}
