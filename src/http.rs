//! Shared HTTP plumbing for the remote providers.
//!
//! # Retry Strategy
//!
//! [`send_with_retry`] applies exponential backoff to transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! With `max_retries = 0` (the default everywhere) each request is sent
//! exactly once.

use anyhow::{anyhow, bail, Context, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// Build a client with the given request timeout.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Send the request produced by `build`, retrying transient failures.
///
/// `label` names the remote API in error messages (e.g. `"Pinecone query"`).
/// Returns the response only when its status is a success.
pub async fn send_with_retry<F>(
    label: &str,
    max_retries: u32,
    build: F,
) -> Result<reqwest::Response>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << (attempt - 1).min(5));
            debug!(label, attempt, ?delay, "retrying request");
            tokio::time::sleep(delay).await;
        }

        match build().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                let body_text = response.text().await.unwrap_or_default();

                // Rate limited or server error — retry
                if status.as_u16() == 429 || status.is_server_error() {
                    warn!(label, %status, "transient API error");
                    last_err = Some(anyhow!("{} API error {}: {}", label, status, body_text));
                    continue;
                }

                // Client error (not 429) — don't retry
                bail!("{} API error {}: {}", label, status, body_text);
            }
            Err(e) => {
                warn!(label, error = %e, "request failed");
                last_err = Some(anyhow!("{} request failed: {}", label, e));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("{} failed after retries", label)))
}
