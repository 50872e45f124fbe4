//! Firebase project configuration (Identity Toolkit + Firestore).

use serde::{Deserialize, Serialize};

fn default_auth_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_collection() -> String {
    "notes".to_string()
}

/// Default HTTP request timeout in seconds.
const fn default_request_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    #[serde(default)]
    pub api_key: String,

    /// Firebase/GCP project ID (e.g., `notekeep-dev`).
    #[serde(default)]
    pub project_id: String,

    /// Identity Toolkit base URL. Point at the auth emulator for local runs.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Secure Token service base URL (ID token refresh).
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Firestore REST base URL.
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    /// Collection that holds note documents.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Per-request HTTP timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            firestore_url: default_firestore_url(),
            collection: default_collection(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl FirebaseConfig {
    /// Check if the Firebase config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.project_id.is_empty()
    }

    /// Resource path of the project's default database documents root.
    ///
    /// e.g. `projects/notekeep-dev/databases/(default)/documents`
    pub fn documents_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }
}
