//! Note list and editor.
//!
//! Each note card is either collapsed or selected (editor open). The editor
//! buffers the title on every keystroke and the content on blur, and only
//! reconciles with the stored note when it closes: at most one update, then
//! a full refetch. Nothing is patched optimistically.

use chrono::{DateTime, Local, Utc};
use nk_auth::AuthGateway;
use nk_core::{CoreError, Note, NoteFields, Route, UserIdentity};
use nk_store::{NoteGateway, NoteStore};

use crate::effect::Effect;

pub const ADD_FAILED: &str = "Failed to add note";
pub const DELETE_FAILED: &str = "Failed to delete note";
pub const LOADING_NOTES: &str = "Loading notes...";
pub const NO_NOTES: &str = "No notes yet - add one above!";

fn local_time(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Header line for the signed-in user.
#[must_use]
pub fn welcome(identity: &UserIdentity) -> String {
    format!("Welcome {}", identity.email)
}

/// A note as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub preview: String,
    pub created: String,
    pub menu_open: bool,
}

/// The open editor for one note.
#[derive(Debug, Clone)]
pub struct Editor {
    note: Note,
    title: String,
    content: String,
    menu_open: bool,
}

impl Editor {
    fn new(note: Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            note,
            menu_open: false,
        }
    }

    /// The note as it was when the editor opened.
    #[must_use]
    pub const fn note(&self) -> &Note {
        &self.note
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub const fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Take the edited content when the content field loses focus.
    pub fn commit_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    #[must_use]
    pub fn last_edited(&self) -> String {
        format!("Last edited: {}", local_time(&self.note.created_at))
    }

    /// Buffered fields, if they differ from the note after trimming.
    fn changes(&self) -> Option<NoteFields> {
        let title_changed = self.title.trim() != self.note.title.trim();
        let content_changed = self.content.trim() != self.note.content.trim();
        (title_changed || content_changed)
            .then(|| NoteFields::new(self.title.clone(), self.content.clone()))
    }
}

#[derive(Debug, Default)]
pub struct HomeView {
    owner: Option<String>,
    notes: Vec<Note>,
    /// New-note title input.
    pub new_title: String,
    /// New-note content input.
    pub new_content: String,
    is_fetching: bool,
    is_adding: bool,
    error: Option<String>,
    menu_open_id: Option<String>,
    editor: Option<Editor>,
}

impl HomeView {
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    #[must_use]
    pub const fn is_adding(&self) -> bool {
        self.is_adding
    }

    /// Inline error shown under the new-note form.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn menu_open_id(&self) -> Option<&str> {
        self.menu_open_id.as_deref()
    }

    #[must_use]
    pub const fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub const fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.editor.as_mut()
    }

    /// New-note inputs are disabled while the list is loading.
    #[must_use]
    pub const fn inputs_enabled(&self) -> bool {
        !self.is_fetching
    }

    /// Text shown instead of the list, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        if !self.notes.is_empty() {
            None
        } else if self.is_fetching {
            Some(LOADING_NOTES)
        } else {
            Some(NO_NOTES)
        }
    }

    #[must_use]
    pub fn cards(&self) -> Vec<NoteCard<'_>> {
        self.notes
            .iter()
            .map(|note| NoteCard {
                id: &note.id,
                title: &note.title,
                preview: note.preview(),
                created: local_time(&note.created_at),
                menu_open: self.menu_open_id.as_deref() == Some(note.id.as_str()),
            })
            .collect()
    }

    /// Show the list for `identity`. Fetches only when the identity changed.
    pub async fn load<S: NoteStore>(&mut self, notes: &NoteGateway<S>, identity: &UserIdentity) {
        if self.owner.as_deref() == Some(identity.uid.as_str()) {
            return;
        }
        *self = Self {
            owner: Some(identity.uid.clone()),
            ..Self::default()
        };
        self.refresh(notes).await;
    }

    /// Forget everything shown for the previous identity.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace the list with a fresh fetch.
    pub async fn refresh<S: NoteStore>(&mut self, notes: &NoteGateway<S>) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        self.is_fetching = true;
        self.notes = notes.get_user_notes(&owner).await;
        self.is_fetching = false;
    }

    /// Create a note from the new-note inputs.
    pub async fn add<S: NoteStore>(&mut self, notes: &NoteGateway<S>) {
        if self.is_adding {
            return;
        }
        let Some(owner) = self.owner.clone() else {
            return;
        };
        let fields = match NoteFields::for_new_note(&self.new_title, &self.new_content) {
            Ok(fields) => fields,
            Err(CoreError::Validation(message)) => {
                self.error = Some(message);
                return;
            }
        };

        self.is_adding = true;
        self.error = None;
        match notes.add_note(&owner, &fields).await {
            Ok(_) => {
                self.new_title.clear();
                self.new_content.clear();
                self.refresh(notes).await;
            }
            Err(_) => self.error = Some(ADD_FAILED.to_string()),
        }
        self.is_adding = false;
    }

    /// Open the editor on a note. Returns false if no such note is listed.
    pub fn open(&mut self, note_id: &str) -> bool {
        let Some(note) = self.notes.iter().find(|n| n.id == note_id) else {
            return false;
        };
        self.editor = Some(Editor::new(note.clone()));
        self.menu_open_id = None;
        true
    }

    /// Toggle a card's menu. Opening one closes any other.
    pub fn toggle_menu(&mut self, note_id: &str) {
        self.menu_open_id = if self.menu_open_id.as_deref() == Some(note_id) {
            None
        } else {
            Some(note_id.to_string())
        };
    }

    pub fn toggle_editor_menu(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.menu_open = !editor.menu_open;
        }
    }

    /// A click outside any menu closes whichever is open.
    pub fn dismiss_menus(&mut self) {
        self.menu_open_id = None;
        if let Some(editor) = &mut self.editor {
            editor.menu_open = false;
        }
    }

    /// Delete a note and refetch the list.
    ///
    /// Deleting the note open in the editor closes it without saving.
    pub async fn delete<S: NoteStore>(&mut self, notes: &NoteGateway<S>, note_id: &str) {
        let Some(owner) = self.owner.clone() else {
            return;
        };
        self.menu_open_id = None;
        if self.editor.as_ref().is_some_and(|e| e.note.id == note_id) {
            self.editor = None;
        }

        if notes.delete_note(&owner, note_id).await.is_err() {
            self.error = Some(DELETE_FAILED.to_string());
        }
        self.refresh(notes).await;
    }

    /// Close the editor, saving buffered edits first.
    ///
    /// At most one update is sent, and only when the trimmed title or content
    /// differs from the stored note. A failed save is logged, not shown. The
    /// list is refetched on every close, whether or not anything was saved.
    pub async fn close<S: NoteStore>(&mut self, notes: &NoteGateway<S>) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        let Some(owner) = self.owner.clone() else {
            return;
        };

        if let Some(fields) = editor.changes() {
            if let Err(error) = notes.update_note(&owner, &editor.note.id, &fields).await {
                tracing::warn!(%error, note_id = %editor.note.id, "auto-save failed");
            }
        }
        self.refresh(notes).await;
    }

    /// Sign out and go back to the login page.
    pub async fn logout(&mut self, auth: &impl AuthGateway) -> Vec<Effect> {
        match auth.logout().await {
            Ok(()) => vec![Effect::Navigate(Route::Login)],
            Err(error) => {
                tracing::error!(%error, "logout failed");
                Vec::new()
            }
        }
    }
}
