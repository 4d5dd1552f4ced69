//! Retry with exponential backoff for query fetches.
//!
//! Unlike a transport-level retry, every failure is retried: the provider's
//! error message is only surfaced once the attempt budget is spent.

use std::future::Future;
use std::time::Duration;

use skycast_core::QueryConfig;

/// Retries for current-weather and forecast lookups.
pub const STANDARD_RETRIES: u32 = 2;
/// Retries for air-quality lookups.
pub const AIR_QUALITY_RETRIES: u32 = 1;

pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub retries: u32,
    /// Delay before the first retry (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            retries,
            base_delay: Duration::from_millis(base_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_RETRIES, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_DELAY_MS)
    }

    pub fn air_quality() -> Self {
        Self::new(AIR_QUALITY_RETRIES, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_DELAY_MS)
    }

    /// Same attempt budget, delays taken from config.
    pub fn with_delays_from(self, config: &QueryConfig) -> Self {
        Self::new(self.retries, config.retry_base_delay_ms, config.retry_max_delay_ms)
    }

    /// No waiting between attempts.
    pub fn immediate(retries: u32) -> Self {
        Self::new(retries, 0, 0)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.base_delay.as_millis() as u64).saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }
}

/// Run `operation` until it succeeds or `policy.retries` extra attempts fail.
///
/// Returns the last error when every attempt fails.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!("Request succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < policy.retries => {
                let delay = policy.delay_for_attempt(attempt);
                attempt += 1;
                tracing::warn!(
                    "Attempt {} of {} failed: {}; retrying in {:?}",
                    attempt,
                    policy.retries + 1,
                    e,
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Err(e) => {
                tracing::error!("All {} attempts failed: {}", policy.retries + 1, e);
                return Err(e);
            }
        }
    }
}
