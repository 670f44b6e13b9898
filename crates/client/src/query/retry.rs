use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

/// Exponential backoff for failed fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made after the first failure.
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Never retries.
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based): the base delay
    /// doubled per attempt, capped at the ceiling.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Runs `fetcher` until it succeeds, fails terminally, or the retry budget
/// is spent. `on_retry` sees the number of retries made so far.
pub(crate) async fn run_with_retry<T, F, Fut>(
    fetcher: &F,
    policy: &RetryPolicy,
    on_retry: impl Fn(u32),
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.retries && e.is_retryable() => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                on_retry(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "Fetch failed, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
