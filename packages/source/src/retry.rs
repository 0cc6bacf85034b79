//! HTTP retry helper for transient upstream errors.
//!
//! The climate archive rate-limits aggressively and its CDN occasionally
//! sheds load, so every fetch goes through [`send_json`] instead of
//! calling `reqwest::RequestBuilder::send()` directly. Transient failures
//! (timeouts, connection resets, HTTP 429, HTTP 5xx) are retried with
//! exponential backoff; other 4xx statuses are permanent and fail
//! immediately.

use std::time::Duration;

use crate::SourceError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (2s, 4s, 8s, 16s, 32s) the total wait before
/// giving up is 62 seconds.
const MAX_RETRIES: u32 = 5;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the request fails after all retries,
/// and [`SourceError::MalformedResponse`] if the server returns a
/// non-retryable status or a body that isn't JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request, MAX_RETRIES).await?;

    let url = response.url().to_string();
    let status = response.status();

    // Read the raw body as text first, then parse as JSON, so the actual
    // response content can be logged on failure.
    let text = response.text().await?;

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            let preview = if text.len() > BODY_PREVIEW_LEN {
                format!("{}...", &text[..BODY_PREVIEW_LEN])
            } else {
                text.clone()
            };
            log::error!(
                "JSON parse failed.\n  \
                 url: {url}\n  \
                 status: {status}\n  \
                 received: {} bytes\n  \
                 parse error: {json_err}\n  \
                 body preview: {preview}",
                text.len(),
            );
            Err(SourceError::MalformedResponse {
                message: format!(
                    "JSON parse failed: {json_err} (status={status}, received {} bytes)",
                    text.len()
                ),
            })
        }
    }
}

/// Core retry loop: sends the request built by `build_request`, retrying
/// transient errors up to `max_retries` times with exponential backoff.
/// Returns the successful response (status 2xx or 3xx).
#[allow(clippy::future_not_send)]
async fn send_inner<F>(
    build_request: &F,
    max_retries: u32,
) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<SourceError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt); // 2s, 4s, 8s
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    last_error = Some(SourceError::Http(e));
                    continue;
                }
                return Err(SourceError::Http(e));
            }
            Ok(response) => {
                let status = response.status();

                // 429 Too Many Requests and 5xx: retry
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    if attempt < max_retries {
                        log::warn!("  HTTP {status}");
                        last_error = Some(SourceError::MalformedResponse {
                            message: format!("HTTP {status}"),
                        });
                        continue;
                    }
                    return Err(SourceError::MalformedResponse {
                        message: format!("HTTP {status} after {max_retries} retries"),
                    });
                }

                // Other 4xx: permanent, don't retry
                if status.is_client_error() {
                    return Err(SourceError::MalformedResponse {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }

    // Should be unreachable, but in case the loop exits without returning:
    Err(last_error.unwrap_or_else(|| SourceError::MalformedResponse {
        message: "request failed after all retries".to_string(),
    }))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}
