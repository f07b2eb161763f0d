//! HTTP retry with exponential backoff for scoring requests.
//!
//! Retries 429, 5xx, timeouts and connect errors; any other status is handed
//! straight back to the caller.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    fn delay(&self, attempt: u32, rate_limited: bool) -> Duration {
        // Rate limits get one extra doubling.
        let exponent = if rate_limited { attempt + 1 } else { attempt };
        self.base_delay.saturating_mul(2u32.saturating_pow(exponent))
    }
}

/// Send the request built by `build_request` until it succeeds, hits a
/// non-retriable status, or the attempts run out.
///
/// The final response is returned whatever its status; only transport
/// failures come back as `Err`.
pub async fn send_with_retry<F>(
    client: &Client,
    build_request: F,
    policy: &RetryPolicy,
    context: &str,
) -> Result<Response, reqwest::Error>
where
    F: Fn(&Client) -> RequestBuilder,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let is_last = attempt + 1 >= attempts;

        match build_request(client).send().await {
            Ok(resp) => {
                let status = resp.status();
                let rate_limited = status == StatusCode::TOO_MANY_REQUESTS;
                if status.is_success() || is_last || !(rate_limited || status.is_server_error()) {
                    return Ok(resp);
                }
                let delay = policy.delay(attempt, rate_limited);
                log_warn!("{}: status {}, retrying in {:?}", context, status, delay);
                tokio::time::sleep(delay).await;
            }
            Err(e) if !is_last && (e.is_timeout() || e.is_connect()) => {
                let delay = policy.delay(attempt, false);
                log_warn!("{}: network error ({}), retrying in {:?}", context, e, delay);
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                log_warn!("{}: request failed after {} attempt(s): {}", context, attempt + 1, e);
                return Err(e);
            }
        }

        attempt += 1;
    }
}
