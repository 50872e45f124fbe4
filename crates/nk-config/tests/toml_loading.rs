//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use nk_config::{NkConfig, StoreBackend};
use pretty_assertions::assert_eq;

#[test]
fn loads_firebase_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[firebase]
api_key = "AIza-toml"
project_id = "notekeep-test"
auth_url = "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1"
collection = "scratch_notes"
request_timeout_secs = 30
"#,
        )?;

        let config: NkConfig = Figment::from(Serialized::defaults(NkConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.firebase.api_key, "AIza-toml");
        assert_eq!(config.firebase.project_id, "notekeep-test");
        assert_eq!(
            config.firebase.auth_url,
            "http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1"
        );
        assert_eq!(config.firebase.collection, "scratch_notes");
        assert_eq!(config.firebase.request_timeout_secs, 30);
        // Fields absent from the file keep their defaults
        assert_eq!(
            config.firebase.firestore_url,
            "https://firestore.googleapis.com/v1"
        );
        assert!(config.firebase.is_configured());
        Ok(())
    });
}

#[test]
fn loads_store_and_session_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
backend = "local"
local_path = "./dev-notes.db"

[session]
keyring_service = "notekeep-test"
persist = false
"#,
        )?;

        let config: NkConfig = Figment::from(Serialized::defaults(NkConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.store.local_path, "./dev-notes.db");
        assert_eq!(config.session.keyring_service, "notekeep-test");
        assert!(!config.session.persist);
        Ok(())
    });
}

#[test]
fn unknown_backend_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
backend = "postgres"
"#,
        )?;

        let result: Result<NkConfig, _> =
            Figment::from(Serialized::defaults(NkConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract();

        assert!(result.is_err(), "unknown backend should not deserialize");
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("NOTEKEEP_FIREBASE__PROJECT_ID", "from-env");

        jail.create_file(
            "config.toml",
            r#"
[firebase]
api_key = "toml-key"
project_id = "from-toml"
"#,
        )?;

        let config: NkConfig = Figment::from(Serialized::defaults(NkConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("NOTEKEEP_").split("__"))
            .extract()?;

        // Env should win over TOML
        assert_eq!(config.firebase.project_id, "from-env");
        // TOML value not overridden by env should remain
        assert_eq!(config.firebase.api_key, "toml-key");
        Ok(())
    });
}

#[test]
fn explicit_project_file_is_used() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[oauth]
client_id = "cid.apps.googleusercontent.com"
client_secret = "shh"
browser_timeout_secs = 30
"#,
        )?;

        let config = NkConfig::load(Some(std::path::Path::new("custom.toml")))
            .map_err(|e| e.to_string())?;

        assert!(config.oauth.is_configured());
        assert_eq!(config.oauth.browser_timeout_secs, 30);
        Ok(())
    });
}

#[test]
fn missing_explicit_project_file_is_an_error() {
    Jail::expect_with(|_jail| {
        let result = NkConfig::load(Some(std::path::Path::new("does-not-exist.toml")));
        assert!(result.is_err());
        Ok(())
    });
}

/// Documents the figment gotcha: typo'd env var keys are silently ignored.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("NOTEKEEP_FIREBASE__API_KEYY", "typo");

        let config: NkConfig = Figment::from(Serialized::defaults(NkConfig::default()))
            .merge(Env::prefixed("NOTEKEEP_").split("__"))
            .extract()?;

        assert!(
            config.firebase.api_key.is_empty(),
            "typo'd env var should be silently ignored by figment"
        );
        Ok(())
    });
}
