//! Shared HTTP response helpers for the entity client.
//!
//! Centralizes status-code mapping so request methods stay focused on
//! request construction and response decoding.

use crate::error::ServiceError;

/// Check an HTTP response for error conditions.
///
/// Returns the response unchanged on success. Otherwise maps:
/// - **400 / 422** → [`ServiceError::Validation`]
/// - **401 / 403** → [`ServiceError::Auth`]
/// - **404** → [`ServiceError::NotFound`]
/// - **429** → [`ServiceError::RateLimited`] with `Retry-After` parsing
///   (falls back to 60 s if absent or unparseable)
/// - anything else → [`ServiceError::Unavailable`]
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == 429 {
        return Err(ServiceError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }

    let code = status.as_u16();
    let message = resp.text().await.unwrap_or_default();
    Err(match code {
        400 | 422 => ServiceError::Validation(message),
        401 | 403 => ServiceError::Auth {
            status: code,
            message,
        },
        404 => ServiceError::NotFound(message),
        _ => ServiceError::Unavailable {
            status: code,
            message,
        },
    })
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
