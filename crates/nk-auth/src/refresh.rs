use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AuthError;
use crate::http::{check_response, form_body};
use crate::session::StoredSession;

/// Refresh ID tokens this many seconds before they expire.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

/// Exchange the session's refresh token for a fresh ID token.
///
/// # Errors
///
/// Returns `AuthError::Provider` if the refresh token was revoked or expired
/// (`TOKEN_EXPIRED`, `USER_DISABLED`, ...), or `AuthError::Http` on transport
/// failure.
pub async fn refresh_session(
    http: &reqwest::Client,
    token_url: &str,
    api_key: &str,
    session: &StoredSession,
) -> Result<StoredSession, AuthError> {
    let url = format!("{token_url}/token?key={}", urlencoding::encode(api_key));
    let resp = http
        .post(&url)
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(form_body(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", &session.refresh_token),
        ]))
        .send()
        .await?;
    let body: RefreshResponse = check_response(resp).await?.json().await?;

    if body.user_id != session.identity.uid {
        return Err(AuthError::Other(format!(
            "refreshed token belongs to '{}', expected '{}'",
            body.user_id, session.identity.uid
        )));
    }

    let expires_at = token_expiry(&body.id_token, &body.expires_in)?;
    tracing::debug!(%expires_at, "ID token refreshed");
    Ok(StoredSession {
        identity: session.identity.clone(),
        id_token: body.id_token,
        refresh_token: body.refresh_token,
        expires_at,
    })
}

/// Expiry of a freshly issued ID token.
///
/// The JWT's own `exp` claim wins; the provider's `expiresIn` seconds are the
/// fallback for tokens that do not decode (emulator tokens are unsigned).
///
/// # Errors
///
/// Returns `AuthError::Parse` if neither source yields a timestamp.
pub fn token_expiry(id_token: &str, expires_in: &str) -> Result<DateTime<Utc>, AuthError> {
    if let Ok(exp) = decode_expiry(id_token) {
        return Ok(exp);
    }
    let secs: i64 = expires_in
        .trim()
        .parse()
        .map_err(|e| AuthError::Parse(format!("expiresIn '{expires_in}': {e}")))?;
    Ok(Utc::now() + chrono::TimeDelta::seconds(secs))
}

/// Decode JWT `exp` claim without signature verification.
///
/// The document store verifies the token; this is only used to schedule
/// refreshes.
///
/// # Errors
///
/// Returns `AuthError::Parse` if the JWT format is invalid or the `exp` claim
/// is missing or cannot be parsed.
pub fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Parse("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::Parse(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::Parse(format!("JSON parse failed: {e}")))?;
    let exp = value["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::Parse("missing exp claim".into()))?;
    DateTime::from_timestamp(exp, 0).ok_or_else(|| AuthError::Parse("invalid exp timestamp".into()))
}
