use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Title shown for notes stored without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Rejection message for a new note without content.
pub const EMPTY_CONTENT: &str = "Note can't be empty";

/// Number of content characters shown on a note card.
pub const PREVIEW_CHARS: usize = 100;

/// A user-owned text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned document ID.
    pub id: String,
    /// Owner `uid`. Set at creation, never reassigned.
    pub user_id: String,
    /// Display title, never empty.
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// `None` until the note is edited for the first time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Content shortened for a list card: the first [`PREVIEW_CHARS`]
    /// characters, followed by `...` when the content is longer.
    #[must_use]
    pub fn preview(&self) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Title and content written on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
}

impl NoteFields {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Fields for a note typed in by the user.
    ///
    /// The title is trimmed and falls back to [`DEFAULT_TITLE`]; content is
    /// kept as typed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the content is empty or only
    /// whitespace.
    pub fn for_new_note(title: &str, content: &str) -> Result<Self, CoreError> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation(EMPTY_CONTENT.to_string()));
        }
        let title = title.trim();
        Ok(Self::new(
            if title.is_empty() { DEFAULT_TITLE } else { title },
            content,
        ))
    }
}

/// Resolve a stored title for display. Absent or empty titles read as
/// [`DEFAULT_TITLE`].
#[must_use]
pub fn resolve_title(raw: Option<String>) -> String {
    match raw {
        Some(title) if !title.is_empty() => title,
        _ => DEFAULT_TITLE.to_string(),
    }
}
