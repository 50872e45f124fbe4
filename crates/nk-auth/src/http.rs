//! Shared HTTP helpers for the identity provider clients.
//!
//! Centralizes the Firebase error envelope
//! (`{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`) so the provider's
//! message reaches the caller verbatim, and form-encodes bodies by hand.

use serde::Deserialize;

use crate::error::AuthError;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    /// Firebase services: `{"error": {"code": 400, "message": "..."}}`.
    Firebase { message: String },
    /// Google OAuth: `{"error": "invalid_grant", "error_description": "..."}`.
    OAuth(String),
}

/// Check a provider response, returning it unchanged on success.
///
/// Non-success statuses become [`AuthError::Provider`] carrying the
/// provider's message (or the raw body when it is not a known envelope).
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AuthError::Provider {
        code: status.as_u16(),
        message: provider_message(&body),
    })
}

fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorBody::Firebase { message } | ErrorBody::OAuth(message),
        }) => message,
        Err(_) if body.trim().is_empty() => "empty error response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Encode `application/x-www-form-urlencoded` pairs.
#[must_use]
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
