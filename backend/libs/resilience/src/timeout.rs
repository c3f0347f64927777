/// Deadline wrapper for store and cache calls
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub duration: Duration,
}

impl TimeoutConfig {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(secs),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_secs(30)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("{operation} timed out after {elapsed:?}")]
    Elapsed {
        operation: &'static str,
        elapsed: Duration,
    },
    #[error(transparent)]
    Inner(E),
}

impl<E> TimeoutError<E> {
    pub fn is_elapsed(&self) -> bool {
        matches!(self, TimeoutError::Elapsed { .. })
    }
}

/// Run a fallible future under a deadline.
///
/// The inner error is passed through untouched so callers keep their own
/// error mapping. When the deadline fires the future is dropped, which
/// cancels the in-flight call.
pub async fn with_timeout<F, T, E>(
    operation: &'static str,
    config: TimeoutConfig,
    future: F,
) -> Result<T, TimeoutError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout(config.duration, future).await {
        Ok(result) => result.map_err(TimeoutError::Inner),
        Err(_) => {
            tracing::debug!(
                operation,
                timeout_ms = config.duration.as_millis() as u64,
                "operation exceeded deadline"
            );
            Err(TimeoutError::Elapsed {
                operation,
                elapsed: config.duration,
            })
        }
    }
}
