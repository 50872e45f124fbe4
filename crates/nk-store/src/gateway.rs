//! Note operations as the views call them.
//!
//! Mutations report their errors; fetching never fails and degrades to an
//! empty list. Every failure is logged here so call sites can stay quiet.

use nk_core::{Note, NoteFields};

use crate::error::StoreError;
use crate::store::NoteStore;

pub struct NoteGateway<S> {
    store: S,
}

impl<S: NoteStore> NoteGateway<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create a note owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Propagates the store error after logging it.
    pub async fn add_note(&self, owner_id: &str, fields: &NoteFields) -> Result<Note, StoreError> {
        tracing::debug!(owner_id, "adding note");
        self.store
            .insert(owner_id, fields)
            .await
            .inspect_err(|error| tracing::error!(%error, owner_id, "error adding note"))
    }

    /// Every note owned by `owner_id`, newest first.
    ///
    /// A failed fetch is logged and reads as no notes.
    pub async fn get_user_notes(&self, owner_id: &str) -> Vec<Note> {
        tracing::debug!(owner_id, "fetching notes");
        match self.store.query_by_owner(owner_id).await {
            Ok(notes) => notes,
            Err(error) => {
                tracing::error!(%error, owner_id, "error fetching notes");
                Vec::new()
            }
        }
    }

    /// Overwrite a note's title and content. `owner_id` is not re-checked;
    /// the backend's access rules scope the call.
    ///
    /// # Errors
    ///
    /// Propagates the store error after logging it.
    pub async fn update_note(
        &self,
        owner_id: &str,
        note_id: &str,
        fields: &NoteFields,
    ) -> Result<(), StoreError> {
        tracing::debug!(owner_id, note_id, "updating note");
        self.store
            .update(note_id, fields)
            .await
            .inspect_err(|error| tracing::error!(%error, note_id, "error updating note"))
    }

    /// Permanently remove a note.
    ///
    /// # Errors
    ///
    /// Propagates the store error after logging it.
    pub async fn delete_note(&self, owner_id: &str, note_id: &str) -> Result<(), StoreError> {
        tracing::debug!(owner_id, note_id, "deleting note");
        self.store
            .delete(note_id)
            .await
            .inspect_err(|error| tracing::error!(%error, note_id, "error deleting note"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store whose every call fails.
    struct Unreachable;

    fn offline() -> StoreError {
        StoreError::Api {
            status: 503,
            message: "unavailable".into(),
        }
    }

    impl NoteStore for Unreachable {
        async fn insert(&self, _: &str, _: &NoteFields) -> Result<Note, StoreError> {
            Err(offline())
        }
        async fn query_by_owner(&self, _: &str) -> Result<Vec<Note>, StoreError> {
            Err(offline())
        }
        async fn update(&self, _: &str, _: &NoteFields) -> Result<(), StoreError> {
            Err(offline())
        }
        async fn delete(&self, _: &str) -> Result<(), StoreError> {
            Err(offline())
        }
    }

    #[tokio::test]
    async fn fetch_failure_reads_as_empty() {
        let gateway = NoteGateway::new(Unreachable);
        assert!(gateway.get_user_notes("u1").await.is_empty());
    }

    #[tokio::test]
    async fn mutation_failures_propagate() {
        let gateway = NoteGateway::new(Unreachable);
        let fields = NoteFields::new("t", "c");
        assert!(gateway.add_note("u1", &fields).await.is_err());
        assert!(gateway.update_note("u1", "n1", &fields).await.is_err());
        assert!(gateway.delete_note("u1", "n1").await.is_err());
    }
}
