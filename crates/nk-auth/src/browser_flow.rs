//! Federated (Google) sign-in through the system browser.
//!
//! 1. Start `tiny_http` on `127.0.0.1:0` (random port)
//! 2. Open the browser on the Google consent page, redirecting to localhost
//! 3. Wait for the callback with an authorization code (in `spawn_blocking`,
//!    `tiny_http::recv` blocks)
//! 4. Exchange the code for a Google ID token
//!
//! The caller hands the Google ID token to the identity provider's
//! `signInWithIdp` endpoint.

use std::io::Cursor;
use std::time::{Duration, Instant};

use nk_config::OAuthConfig;
use serde::Deserialize;

use crate::error::AuthError;
use crate::http::{check_response, form_body};

const SCOPES: &str = "openid email profile";

#[derive(Deserialize)]
struct ExchangeResponse {
    id_token: String,
}

/// What a request to the loopback server carried.
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    /// Authorization code with a matching state nonce.
    Code(String),
    /// The user closed or denied the consent page.
    Denied(String),
    StateMismatch,
    /// Not the callback (favicon, preflight, ...). Keep waiting.
    Ignore,
}

/// Run the browser consent flow and return a Google ID token.
///
/// # Errors
///
/// Returns `AuthError::FederatedNotConfigured` without OAuth client
/// credentials, and `AuthError::BrowserFlowFailed` if the server cannot bind,
/// the consent is denied, the state nonce does not match, or the callback
/// times out.
pub async fn authorize(http: &reqwest::Client, oauth: &OAuthConfig) -> Result<String, AuthError> {
    if !oauth.is_configured() {
        return Err(AuthError::FederatedNotConfigured);
    }

    let server = tiny_http::Server::http("127.0.0.1:0")
        .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to bind: {e}")))?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|a| a.port())
        .ok_or_else(|| AuthError::BrowserFlowFailed("no port".into()))?;

    let state = random_state()?;
    let redirect_uri = format!("http://127.0.0.1:{port}/callback");
    let url = consent_url(oauth, &redirect_uri, &state);

    eprintln!("Opening browser to: {url}");
    if let Err(error) = open::that(&url) {
        tracing::warn!(%error, "failed to open browser");
        eprintln!("Open the URL above manually, then return here.");
    }

    let timeout = Duration::from_secs(oauth.browser_timeout_secs);
    let code = tokio::task::spawn_blocking(move || wait_for_callback(&server, timeout, &state))
        .await
        .map_err(|e| AuthError::BrowserFlowFailed(format!("spawn_blocking join: {e}")))??;

    exchange_code(http, oauth, &code, &redirect_uri).await
}

/// 16 random bytes, hex encoded. Guards the callback against CSRF.
fn random_state() -> Result<String, AuthError> {
    let mut nonce = [0u8; 16];
    getrandom::fill(&mut nonce)
        .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to generate state nonce: {e}")))?;
    Ok(nonce.iter().map(|b| format!("{b:02x}")).collect())
}

fn consent_url(oauth: &OAuthConfig, redirect_uri: &str, state: &str) -> String {
    format!(
        "{base}?{query}",
        base = oauth.authorize_url,
        query = form_body(&[
            ("client_id", &oauth.client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("state", state),
            ("prompt", "select_account"),
        ])
    )
}

async fn exchange_code(
    http: &reqwest::Client,
    oauth: &OAuthConfig,
    code: &str,
    redirect_uri: &str,
) -> Result<String, AuthError> {
    let resp = http
        .post(&oauth.exchange_url)
        .header(
            reqwest::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(form_body(&[
            ("code", code),
            ("client_id", &oauth.client_id),
            ("client_secret", &oauth.client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ]))
        .send()
        .await?;
    let body: ExchangeResponse = check_response(resp).await?.json().await?;
    Ok(body.id_token)
}

/// Block until the callback server receives the redirect.
///
/// Loops on `recv_timeout()`, ignoring requests that are not `/callback?...`
/// (favicon requests, user refreshes).
fn wait_for_callback(
    server: &tiny_http::Server,
    timeout: Duration,
    expected_state: &str,
) -> Result<String, AuthError> {
    let deadline = Instant::now() + timeout;
    let timed_out = || {
        AuthError::BrowserFlowFailed(format!(
            "browser callback timed out after {}s",
            timeout.as_secs()
        ))
    };

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(timed_out());
        }

        let request = match server.recv_timeout(remaining) {
            Ok(Some(req)) => req,
            Ok(None) => return Err(timed_out()),
            Err(e) => return Err(AuthError::BrowserFlowFailed(format!("recv error: {e}"))),
        };

        match parse_callback(request.url(), expected_state) {
            Callback::Ignore => {
                let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            }
            Callback::Code(code) => {
                let _ = request.respond(html_page(
                    "Signed in!",
                    "You can close this tab and return to Notekeep.",
                ));
                return Ok(code);
            }
            Callback::Denied(reason) => {
                let _ = request.respond(html_page("Sign-in cancelled", "Check the terminal."));
                return Err(AuthError::BrowserFlowFailed(format!(
                    "consent was not granted: {reason}"
                )));
            }
            Callback::StateMismatch => {
                let _ = request.respond(html_page(
                    "Sign-in failed",
                    "State mismatch. Check the terminal.",
                ));
                return Err(AuthError::BrowserFlowFailed(
                    "state mismatch, possible CSRF".into(),
                ));
            }
        }
    }
}

fn parse_callback(url: &str, expected_state: &str) -> Callback {
    let Some(query) = url.strip_prefix("/callback?") else {
        return Callback::Ignore;
    };

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map(std::borrow::Cow::into_owned)
            .unwrap_or_default();
        match key {
            "code" => code = Some(value),
            "state" => state = Some(value),
            "error" => error = Some(value),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Callback::StateMismatch;
    }
    match (code, error) {
        (_, Some(reason)) => Callback::Denied(reason),
        (Some(code), None) if !code.is_empty() => Callback::Code(code),
        _ => Callback::Ignore,
    }
}

fn html_page(title: &str, message: &str) -> tiny_http::Response<Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_string(format!(
        "<html><body><h1>{title}</h1><p>{message}</p></body></html>"
    ));
    match tiny_http::Header::from_bytes("Content-Type", "text/html") {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn callback_with_code_and_state() {
        let got = parse_callback("/callback?state=abc&code=4%2F0Adeu", "abc");
        assert_eq!(got, Callback::Code("4/0Adeu".into()));
    }

    #[test]
    fn callback_with_wrong_state_is_rejected() {
        let got = parse_callback("/callback?state=evil&code=xyz", "abc");
        assert_eq!(got, Callback::StateMismatch);
    }

    #[test]
    fn callback_without_state_is_rejected() {
        assert_eq!(parse_callback("/callback?code=xyz", "abc"), Callback::StateMismatch);
    }

    #[test]
    fn denied_consent_is_reported() {
        let got = parse_callback("/callback?error=access_denied&state=abc", "abc");
        assert_eq!(got, Callback::Denied("access_denied".into()));
    }

    #[test]
    fn unrelated_requests_are_ignored() {
        assert_eq!(parse_callback("/favicon.ico", "abc"), Callback::Ignore);
        assert_eq!(parse_callback("/callback?state=abc", "abc"), Callback::Ignore);
    }

    #[test]
    fn consent_url_carries_client_and_state() {
        let oauth = OAuthConfig {
            client_id: "cid.apps.googleusercontent.com".into(),
            client_secret: "secret".into(),
            ..Default::default()
        };
        let url = consent_url(&oauth, "http://127.0.0.1:4321/callback", "nonce");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=cid.apps.googleusercontent.com"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A4321%2Fcallback"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=nonce"));
        assert!(!url.contains("secret"));
    }

    #[test]
    fn random_state_is_hex() {
        let state = random_state().unwrap();
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn unconfigured_oauth_fails_fast() {
        let http = reqwest::Client::new();
        let err = authorize(&http, &OAuthConfig::default()).await.unwrap_err();
        assert!(matches!(err, AuthError::FederatedNotConfigured));
    }
}
