use chrono::{DateTime, Utc};
use nk_core::UserIdentity;
use serde::{Deserialize, Serialize};

/// A signed-in provider session.
///
/// Produced by every successful sign-in and by token refresh; persisted by
/// [`crate::session_store::SessionStore`] so the next run starts signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub identity: UserIdentity,
    /// Firebase ID token (JWT), sent as the bearer token to the document store.
    pub id_token: String,
    /// Long-lived token used to mint new ID tokens.
    pub refresh_token: String,
    /// ID token expiration time.
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    /// Check if the ID token is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }
}
