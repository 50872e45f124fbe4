use serde::{Deserialize, Serialize};

/// Authenticated user identity as issued by the identity provider.
///
/// Produced by `nk-auth`, read by the session context and views. The client
/// never constructs one on its own behalf or mutates it after issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider user ID (Firebase `localId`).
    pub uid: String,
    /// Account email.
    pub email: String,
    /// Profile photo URL, if the provider has one.
    pub photo_url: Option<String>,
    /// Display name, if the provider has one.
    pub display_name: Option<String>,
}
