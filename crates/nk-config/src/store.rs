//! Note store backend selection.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Hosted Cloud Firestore.
    #[default]
    Firestore,
    /// Local libSQL file, for development without a Firebase project.
    Local,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Firestore => "firestore",
            Self::Local => "local",
        })
    }
}

fn default_local_path() -> String {
    ".notekeep/notes.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file used by the local backend (`:memory:` is accepted).
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            local_path: default_local_path(),
        }
    }
}
