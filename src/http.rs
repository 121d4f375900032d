//! Shared outbound HTTP plumbing for the vendor clients.
//!
//! One `reqwest::Client` is built at startup and cloned into every vendor
//! client (reqwest clients are cheap handles over a shared pool). Retries
//! cover 429/5xx and transport errors with exponential backoff, honoring
//! Retry-After when the vendor sends one.

use std::time::Duration;

use crate::error::ApiError;

/// Default per-request timeout for all vendor calls.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Build the shared outbound client. Fails only on TLS backend
/// initialization problems, which should abort startup.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("practiceos/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

fn status_is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn retry_delay(
    attempt: u32,
    policy: &RetryPolicy,
    retry_after: Option<&reqwest::header::HeaderValue>,
) -> Duration {
    if let Some(value) = retry_after.and_then(|v| v.to_str().ok()) {
        if let Ok(secs) = value.parse::<u64>() {
            return Duration::from_secs(secs.min(30));
        }
    }

    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    let base = policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms);
    Duration::from_millis(base)
}

/// Send a request, retrying retryable failures.
///
/// Returns the final response regardless of status; callers decide how a
/// non-2xx maps into their error type.
pub async fn send_with_retry(
    vendor: &'static str,
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, ApiError> {
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        let Some(cloned) = request.try_clone() else {
            // Streaming bodies can't be cloned; single attempt.
            return request
                .send()
                .await
                .map_err(|e| ApiError::from_reqwest(vendor, e));
        };

        match cloned.send().await {
            Ok(response) => {
                let status = response.status();
                if status_is_retryable(status) && attempt < attempts {
                    let delay = retry_delay(
                        attempt,
                        policy,
                        response.headers().get(reqwest::header::RETRY_AFTER),
                    );
                    log::warn!(
                        "{} retry {}/{} after status {} (sleep {:?})",
                        vendor,
                        attempt,
                        attempts,
                        status,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Ok(response);
            }
            Err(err) => {
                let retryable_transport = err.is_timeout() || err.is_connect();
                if retryable_transport && attempt < attempts {
                    let delay = retry_delay(attempt, policy, None);
                    log::warn!(
                        "{} retry {}/{} after transport error: {} (sleep {:?})",
                        vendor,
                        attempt,
                        attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(ApiError::from_reqwest(vendor, err));
            }
        }
    }

    Err(ApiError::Transport {
        vendor,
        detail: "request exhausted retries".to_string(),
    })
}

/// Map a non-2xx response to `ApiError::Upstream`, or pass the response on.
pub async fn check_status(
    vendor: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().await.unwrap_or_default();
    Err(ApiError::Upstream {
        vendor,
        status: status.as_u16(),
        detail,
    })
}
