//! # nk-config
//!
//! Layered configuration loading for Notekeep using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`NOTEKEEP_*` prefix, `__` as separator)
//! 2. Project-level `.notekeep/config.toml` (or an explicit `--config` file)
//! 3. User-level `~/.config/notekeep/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `NOTEKEEP_FIREBASE__API_KEY` -> `firebase.api_key`,
//! `NOTEKEEP_STORE__BACKEND` -> `store.backend`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use nk_config::NkConfig;
//!
//! let config = NkConfig::load(None).expect("config");
//!
//! if config.firebase.is_configured() {
//!     println!("Firebase project: {}", config.firebase.project_id);
//! }
//! ```

mod error;
mod firebase;
mod oauth;
mod session;
mod store;

pub use error::ConfigError;
pub use firebase::FirebaseConfig;
pub use oauth::OAuthConfig;
pub use session::SessionConfig;
pub use store::{StoreBackend, StoreConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment variables read into the config.
pub const ENV_PREFIX: &str = "NOTEKEEP_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NkConfig {
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl NkConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// `project_file` replaces the project-local `.notekeep/config.toml` layer
    /// when given. `.env` files are the caller's business.
    pub fn load(project_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(project_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment(project_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config (an explicit file must exist)
        match project_file {
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None => {
                let local_path = PathBuf::from(".notekeep/config.toml");
                if local_path.exists() {
                    figment = figment.merge(Toml::file(local_path));
                }
            }
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that parse but cannot work.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.firebase.collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "firebase.collection".into(),
                reason: "collection name must not be empty".into(),
            });
        }
        if self.firebase.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "firebase.request_timeout_secs".into(),
                reason: "timeout must be at least one second".into(),
            });
        }
        if self.store.backend == StoreBackend::Local && self.store.local_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.local_path".into(),
                reason: "local backend needs a database path".into(),
            });
        }
        Ok(())
    }

    /// Fail with [`ConfigError::NotConfigured`] unless the Firebase section
    /// has an API key and project ID.
    pub fn require_firebase(&self) -> Result<&FirebaseConfig, ConfigError> {
        if self.firebase.is_configured() {
            Ok(&self.firebase)
        } else {
            Err(ConfigError::NotConfigured {
                section: "firebase".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("notekeep").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = NkConfig::default();
        assert!(!config.firebase.is_configured());
        assert!(!config.oauth.is_configured());
        assert_eq!(config.store.backend, StoreBackend::Firestore);
        assert!(config.session.persist);
    }

    #[test]
    fn default_config_validates() {
        assert!(NkConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_collection_is_rejected() {
        let mut config = NkConfig::default();
        config.firebase.collection = " ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("firebase.collection"));
    }

    #[test]
    fn require_firebase_reports_section() {
        let err = NkConfig::default().require_firebase().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "firebase"));
    }
}
