use nk_auth::FirebaseAuth;
use nk_config::{NkConfig, StoreBackend};
use nk_core::{Note, NoteFields};

use crate::error::StoreError;
use crate::firestore::FirestoreStore;
use crate::local::LocalStore;
use crate::store::NoteStore;

/// The note backend selected by `store.backend`.
pub enum NoteBackend {
    Firestore(FirestoreStore),
    Local(LocalStore),
}

impl NoteBackend {
    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the local database cannot be opened or the
    /// Firestore HTTP client cannot be built.
    pub async fn from_config(config: &NkConfig, auth: &FirebaseAuth) -> Result<Self, StoreError> {
        tracing::debug!(backend = %config.store.backend, "opening note store");
        match config.store.backend {
            StoreBackend::Firestore => Ok(Self::Firestore(FirestoreStore::new(
                &config.firebase,
                auth.clone(),
            )?)),
            StoreBackend::Local => Ok(Self::Local(
                LocalStore::open(&config.store.local_path).await?,
            )),
        }
    }
}

impl NoteStore for NoteBackend {
    async fn insert(&self, owner_id: &str, fields: &NoteFields) -> Result<Note, StoreError> {
        match self {
            Self::Firestore(store) => store.insert(owner_id, fields).await,
            Self::Local(store) => store.insert(owner_id, fields).await,
        }
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Note>, StoreError> {
        match self {
            Self::Firestore(store) => store.query_by_owner(owner_id).await,
            Self::Local(store) => store.query_by_owner(owner_id).await,
        }
    }

    async fn update(&self, note_id: &str, fields: &NoteFields) -> Result<(), StoreError> {
        match self {
            Self::Firestore(store) => store.update(note_id, fields).await,
            Self::Local(store) => store.update(note_id, fields).await,
        }
    }

    async fn delete(&self, note_id: &str) -> Result<(), StoreError> {
        match self {
            Self::Firestore(store) => store.delete(note_id).await,
            Self::Local(store) => store.delete(note_id).await,
        }
    }
}
