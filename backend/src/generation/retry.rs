//! Exponential backoff for generation calls
//!
//! Every generation request gets the same treatment: try once, then retry up
//! to `max_retries` times, doubling the pause each time (1s, 2s, 4s with the
//! default configuration). The last failure is returned to the caller.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::AiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// `initial * 2^attempt`, attempt counted from zero
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(1_u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }

    /// The full backoff schedule
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries)
            .map(|attempt| self.delay_for_attempt(attempt))
            .collect()
    }

    /// Run `op` until it succeeds or the retries are used up.
    ///
    /// `kind` labels logs and the `generation_retries_total` counter.
    pub async fn run<T, E, F, Fut>(&self, kind: &'static str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_retries => {
                    let delay = self.delay_for_attempt(attempt);
                    attempt += 1;
                    warn!(
                        kind,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Generation attempt failed, retrying"
                    );
                    metrics::counter!("generation_retries_total", "kind" => kind).increment(1);
                    tokio::time::sleep(delay).await;
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

impl From<&AiConfig> for RetryPolicy {
    fn from(config: &AiConfig) -> Self {
        Self::new(config.max_retries, config.initial_backoff())
    }
}
