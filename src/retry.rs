use std::future::Future;
use std::time::Duration;

use anyhow::Result;

/// Fixed-interval retry policy for calls to external capabilities.
///
/// Plain data so call sites and tests can swap parameters freely; the
/// default mirrors production: three attempts, one second apart, no
/// backoff, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Zero-delay variant for tests.
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Run `op` until it succeeds or the attempt budget is spent,
    /// sleeping the fixed delay between attempts. The last error is
    /// returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(_) if attempt < self.max_attempts => {
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
