//! Entity structs for Notekeep domain objects.
//!
//! Each entity maps to one record in the document store. Store-side shapes
//! with optional fields live in `nk-store`; the types here are already
//! resolved (defaults applied) and are what views work with.

mod note;

pub use note::{DEFAULT_TITLE, EMPTY_CONTENT, Note, NoteFields, PREVIEW_CHARS, resolve_title};
