use std::fs;
use std::path::PathBuf;

use crate::error::AuthError;
use crate::session::StoredSession;

const KEYRING_USER: &str = "firebase-session";
const SESSION_FILE_NAME: &str = "session.json";

/// Persists the signed-in session between runs.
///
/// Prefers the OS keychain and falls back to a `0600` JSON file under
/// `~/.notekeep/`. Some platforms accept keychain writes they cannot read
/// back (the keyring mock store), so a write only counts once it reads back.
#[derive(Debug, Clone)]
pub struct SessionStore {
    keyring_service: Option<String>,
    file: PathBuf,
}

impl SessionStore {
    /// Keychain-backed store under `keyring_service`, with the default file fallback.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the home directory cannot be resolved.
    pub fn new(keyring_service: &str) -> Result<Self, AuthError> {
        let file = dirs::home_dir()
            .map(|h| h.join(".notekeep").join(SESSION_FILE_NAME))
            .ok_or_else(|| {
                AuthError::SessionStore("home directory not found, cannot store session".into())
            })?;
        Ok(Self {
            keyring_service: Some(keyring_service.to_string()),
            file,
        })
    }

    /// File-only store at an explicit path. Never touches the keychain.
    #[must_use]
    pub fn file_only(file: PathBuf) -> Self {
        Self {
            keyring_service: None,
            file,
        }
    }

    /// Save the session. Falls back to the file if the keychain is unusable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if both keychain and file storage fail.
    pub fn store(&self, session: &StoredSession) -> Result<(), AuthError> {
        let json = serde_json::to_string(session)
            .map_err(|e| AuthError::SessionStore(format!("serialize session: {e}")))?;

        if let Some(service) = &self.keyring_service {
            match store_keyring(service, &json) {
                Ok(()) => {
                    // Keep a single copy.
                    self.remove_file()?;
                    return Ok(());
                }
                Err(error) => {
                    tracing::warn!(%error, "keyring store failed; falling back to file");
                }
            }
        }
        self.store_file(&json)
    }

    /// Load the saved session. Priority: keychain → file.
    ///
    /// Unreadable or corrupt entries are logged and treated as absent.
    #[must_use]
    pub fn load(&self) -> Option<StoredSession> {
        let raw = self
            .keyring_service
            .as_deref()
            .and_then(load_keyring)
            .or_else(|| self.load_file())?;

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::warn!(%error, "stored session is corrupt; ignoring it");
                None
            }
        }
    }

    /// Delete the session from keychain and file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the session file cannot be removed.
    pub fn delete(&self) -> Result<(), AuthError> {
        if let Some(service) = &self.keyring_service {
            // May not exist
            if let Ok(entry) = keyring::Entry::new(service, KEYRING_USER) {
                let _ = entry.delete_credential();
            }
        }
        self.remove_file()
    }

    fn store_file(&self, json: &str) -> Result<(), AuthError> {
        let path = &self.file;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AuthError::SessionStore(format!("mkdir {}: {e}", parent.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(path, json)
            .map_err(|e| AuthError::SessionStore(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::SessionStore(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        fs::read_to_string(&self.file)
            .ok()
            .filter(|s| !s.trim().is_empty())
    }

    fn remove_file(&self) -> Result<(), AuthError> {
        if self.file.exists() {
            fs::remove_file(&self.file).map_err(|e| {
                AuthError::SessionStore(format!("failed to delete {}: {e}", self.file.display()))
            })?;
        }
        Ok(())
    }
}

fn store_keyring(service: &str, json: &str) -> Result<(), AuthError> {
    let entry = keyring::Entry::new(service, KEYRING_USER)
        .map_err(|e| AuthError::SessionStore(format!("keyring unavailable: {e}")))?;
    entry
        .set_password(json)
        .map_err(|e| AuthError::SessionStore(format!("keyring write: {e}")))?;

    if load_keyring(service).as_deref() == Some(json) {
        Ok(())
    } else {
        Err(AuthError::SessionStore("keyring did not persist the session".into()))
    }
}

fn load_keyring(service: &str) -> Option<String> {
    let entry = keyring::Entry::new(service, KEYRING_USER).ok()?;
    entry.get_password().ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use nk_core::UserIdentity;

    use super::*;

    fn session() -> StoredSession {
        StoredSession {
            identity: UserIdentity {
                uid: "uid-1".into(),
                email: "ada@example.com".into(),
                photo_url: Some("https://example.com/ada.png".into()),
                display_name: None,
            },
            id_token: "id".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn default_file_is_under_home() {
        let store = SessionStore::new("notekeep-test").expect("should resolve");
        assert!(store.file.ends_with(".notekeep/session.json"));
    }

    #[test]
    fn file_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = SessionStore::file_only(tmp.path().join("nested").join("session.json"));

        store.store(&session()).expect("store");
        assert_eq!(store.load(), Some(session()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&store.file)
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(mode, 0o600, "session file should be 0600");
        }

        store.delete().expect("delete");
        assert!(store.load().is_none());
        assert!(!store.file.exists());
    }

    #[test]
    fn load_ignores_whitespace_file() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "   \n  ").expect("write");
        assert!(SessionStore::file_only(path).load().is_none());
    }

    #[test]
    fn load_ignores_corrupt_file() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");
        assert!(SessionStore::file_only(path).load().is_none());
    }

    #[test]
    fn delete_without_file_is_ok() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = SessionStore::file_only(tmp.path().join("missing.json"));
        assert!(store.delete().is_ok());
    }
}
