//! Raw stored shape of a note.

use chrono::{DateTime, Utc};
use nk_core::Note;
use nk_core::entities::resolve_title;

use crate::error::StoreError;

/// A note as the backend hands it over, before defaults are applied.
///
/// Other clients of the same collection may leave fields out, so everything
/// the store does not require is optional here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: String,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<NoteRecord> for Note {
    type Error = StoreError;

    /// The one place stored defaults are resolved: a missing or empty title
    /// reads as `"Untitled"`, missing content as `""`.
    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        let user_id = record
            .user_id
            .ok_or_else(|| StoreError::Parse(format!("note {} has no owner", record.id)))?;
        let created_at = record
            .created_at
            .ok_or_else(|| StoreError::Parse(format!("note {} has no creation time", record.id)))?;
        Ok(Self {
            id: record.id,
            user_id,
            title: resolve_title(record.title),
            content: record.content.unwrap_or_default(),
            created_at,
            updated_at: record.updated_at,
        })
    }
}
