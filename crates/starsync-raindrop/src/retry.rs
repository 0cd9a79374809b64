//! Back-off on HTTP 429 for the Raindrop.io API
//!
//! Raindrop allows a fixed number of requests per minute per token. When
//! the budget is spent it answers 429 and names the wait either through
//! `Retry-After` (seconds or HTTP-date) or `X-RateLimit-Reset` (epoch).

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use tracing::warn;

/// Retry budget for throttled requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 disables retrying
    pub max_retries: u32,
    /// Wait used when the response names none
    pub default_delay: Duration,
    /// Longest single wait honoured
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            default_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay to wait before retrying a throttled response
    pub fn delay_for(&self, headers: &HeaderMap) -> Duration {
        let retry_after = headers.get(RETRY_AFTER).and_then(|v| v.to_str().ok());
        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok());

        let delay = if let Some(value) = retry_after {
            parse_retry_after(value, self.default_delay)
        } else if let Some(value) = reset {
            parse_reset_epoch(value, self.default_delay)
        } else {
            self.default_delay
        };

        delay.min(self.max_delay)
    }
}

/// Parses a `Retry-After` header value into a Duration
///
/// Accepts integer seconds or an HTTP-date. Dates in the past mean "now".
pub fn parse_retry_after(value: &str, default: Duration) -> Duration {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Duration::from_secs(seconds);
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        let wait = date.with_timezone(&chrono::Utc) - chrono::Utc::now();
        return wait.to_std().unwrap_or(Duration::ZERO);
    }

    warn!(value, "Could not parse Retry-After header, using default");
    default
}

/// Parses an `X-RateLimit-Reset` epoch into the wait until that instant
fn parse_reset_epoch(value: &str, default: Duration) -> Duration {
    match value.trim().parse::<i64>() {
        Ok(epoch) => {
            let wait = epoch - chrono::Utc::now().timestamp();
            Duration::from_secs(wait.max(0) as u64)
        }
        Err(_) => default,
    }
}
