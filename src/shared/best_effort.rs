//! Time-bounded, failure-swallowing execution for side effects
//!
//! Cache and event calls run after the primary write has committed. They must
//! never stall or fail the request that triggered them, so each call is
//! wrapped in a timeout and any error is logged and dropped.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Run `operation` with a deadline. Returns `None` on error or timeout.
pub async fn best_effort<Fut, T, E>(
    timeout: Duration,
    operation_name: &str,
    operation: Fut,
) -> Option<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(err)) => {
            warn!(
                operation = operation_name,
                error = %err,
                "Side effect failed, continuing"
            );
            None
        }
        Err(_) => {
            warn!(
                operation = operation_name,
                timeout_ms = timeout.as_millis() as u64,
                "Side effect timed out, continuing"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let out = best_effort(Duration::from_secs(1), "ok", async { Ok::<_, String>(5) }).await;
        assert_eq!(out, Some(5));
    }

    #[tokio::test]
    async fn swallows_errors() {
        let out = best_effort(Duration::from_secs(1), "err", async {
            Err::<i32, _>("boom".to_string())
        })
        .await;
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn swallows_timeouts() {
        let out = best_effort(Duration::from_millis(10), "slow", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(1)
        })
        .await;
        assert_eq!(out, None);
    }
}
