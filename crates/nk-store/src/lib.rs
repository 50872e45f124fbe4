//! # nk-store
//!
//! Note storage for Notekeep.
//!
//! [`NoteStore`] is the raw backend seam, implemented by [`FirestoreStore`]
//! (Cloud Firestore REST, authenticated with the signed-in user's ID token)
//! and [`LocalStore`] (a libSQL file, or `:memory:` for tests).
//! [`NoteGateway`] layers the call-site policy on top: mutations report
//! errors, fetches degrade to an empty list.

pub mod backend;
pub mod error;
pub mod firestore;
pub mod gateway;
pub mod helpers;
pub mod local;
mod migrations;
pub mod record;
pub mod store;

pub use backend::NoteBackend;
pub use error::StoreError;
pub use firestore::FirestoreStore;
pub use gateway::NoteGateway;
pub use local::LocalStore;
pub use record::NoteRecord;
pub use store::NoteStore;
