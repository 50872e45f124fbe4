use std::future::Future;

use nk_core::{Note, NoteFields};

use crate::error::StoreError;

/// Raw storage seam for notes. Every operation reports its errors.
pub trait NoteStore: Send + Sync {
    /// Create a note owned by `owner_id` with `created_at` set to now.
    fn insert(
        &self,
        owner_id: &str,
        fields: &NoteFields,
    ) -> impl Future<Output = Result<Note, StoreError>> + Send;

    /// All readable notes owned by `owner_id`, newest first. Records that
    /// fail to decode are logged and left out.
    fn query_by_owner(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<Note>, StoreError>> + Send;

    /// Overwrite title and content and set `updated_at` to now.
    ///
    /// Fails with [`StoreError::NotFound`] if the note does not exist.
    fn update(
        &self,
        note_id: &str,
        fields: &NoteFields,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a note permanently. Removing a missing note is not an error.
    fn delete(&self, note_id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
