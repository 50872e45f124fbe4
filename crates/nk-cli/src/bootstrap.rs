use std::path::Path;

use anyhow::Context;
use nk_auth::FirebaseAuth;
use nk_config::NkConfig;
use nk_store::{NoteBackend, NoteGateway};

use crate::cli::GlobalFlags;

/// Gateways the shell drives.
pub struct Services {
    pub auth: FirebaseAuth,
    pub notes: NoteGateway<NoteBackend>,
}

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<NkConfig> {
    load_dotenv(flags.config.as_deref())?;
    NkConfig::load(flags.config.as_deref()).context("failed to load configuration")
}

/// Load `.env` from the working directory, or next to an explicit config file.
fn load_dotenv(config_file: Option<&Path>) -> anyhow::Result<()> {
    let dir = match config_file.and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("failed to determine current directory")?,
    };
    let env_path = dir.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

pub async fn connect(config: &NkConfig) -> anyhow::Result<Services> {
    config
        .require_firebase()
        .context("set firebase.api_key and firebase.project_id (or NOTEKEEP_FIREBASE__API_KEY / NOTEKEEP_FIREBASE__PROJECT_ID)")?;
    if !config.oauth.is_configured() {
        tracing::debug!("oauth client not configured; Google login will fail");
    }

    let auth = FirebaseAuth::from_config(config).context("failed to initialize auth client")?;
    let backend = NoteBackend::from_config(config, &auth)
        .await
        .with_context(|| format!("failed to open {} note store", config.store.backend))?;
    Ok(Services {
        auth,
        notes: NoteGateway::new(backend),
    })
}
