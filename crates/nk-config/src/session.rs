//! Signed-in session persistence settings.

use serde::{Deserialize, Serialize};

fn default_keyring_service() -> String {
    "notekeep".to_string()
}

const fn default_persist() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// OS keychain service name the session is stored under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Keep the session across restarts. When false, every run starts signed out.
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keyring_service: default_keyring_service(),
            persist: default_persist(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SessionConfig::default();
        assert_eq!(config.keyring_service, "notekeep");
        assert!(config.persist);
    }
}
