use figment::Jail;
use nk_config::{NkConfig, StoreBackend};
use pretty_assertions::assert_eq;

#[test]
fn env_selects_local_backend() {
    Jail::expect_with(|jail| {
        jail.set_env("NOTEKEEP_STORE__BACKEND", "local");
        jail.set_env("NOTEKEEP_STORE__LOCAL_PATH", ":memory:");

        let config = NkConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.store.local_path, ":memory:");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".notekeep")?;
        jail.create_file(
            ".notekeep/config.toml",
            r#"
[session]
keyring_service = "from-file"
"#,
        )?;
        jail.set_env("NOTEKEEP_SESSION__KEYRING_SERVICE", "from-env");

        let config = NkConfig::load(None).map_err(|e| e.to_string())?;
        assert_eq!(config.session.keyring_service, "from-env");
        Ok(())
    });
}

#[test]
fn invalid_timeout_is_rejected_on_load() {
    Jail::expect_with(|jail| {
        jail.set_env("NOTEKEEP_FIREBASE__REQUEST_TIMEOUT_SECS", "0");

        let err = NkConfig::load(None).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
        Ok(())
    });
}
