use thiserror::Error;

/// Provider messages that mean the email/password pair was rejected.
const INVALID_CREDENTIAL_CODES: &[&str] = &[
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "USER_DISABLED",
];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not signed in")]
    NotAuthenticated,

    /// The identity provider rejected the call. `message` is the provider's
    /// own error string, e.g. `EMAIL_EXISTS` or
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    #[error("identity provider error ({code}): {message}")]
    Provider { code: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("browser login failed: {0}")]
    BrowserFlowFailed(String),

    #[error("federated login is not configured (set oauth.client_id and oauth.client_secret)")]
    FederatedNotConfigured,

    #[error("session store error: {0}")]
    SessionStore(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

impl AuthError {
    /// Provider error code without the human-readable suffix
    /// (`WEAK_PASSWORD : ...` → `WEAK_PASSWORD`).
    #[must_use]
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Provider { message, .. } => {
                Some(message.split(" : ").next().unwrap_or(message).trim())
            }
            _ => None,
        }
    }

    /// Whether the provider rejected the credentials themselves (as opposed
    /// to a transport or configuration failure).
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        self.provider_code()
            .is_some_and(|code| INVALID_CREDENTIAL_CODES.contains(&code))
    }
}
