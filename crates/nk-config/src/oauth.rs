//! Federated (Google) sign-in configuration.

use serde::{Deserialize, Serialize};

fn default_authorize_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_exchange_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Default browser callback timeout in seconds.
const fn default_browser_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthConfig {
    /// Google OAuth client ID (desktop application type).
    #[serde(default)]
    pub client_id: String,

    /// Google OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Consent page URL.
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    /// Authorization code exchange endpoint.
    #[serde(default = "default_exchange_url")]
    pub exchange_url: String,

    /// How long to wait for the browser redirect, in seconds.
    #[serde(default = "default_browser_timeout_secs")]
    pub browser_timeout_secs: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: default_authorize_url(),
            exchange_url: default_exchange_url(),
            browser_timeout_secs: default_browser_timeout_secs(),
        }
    }
}

impl OAuthConfig {
    /// Check if federated sign-in can be attempted.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
