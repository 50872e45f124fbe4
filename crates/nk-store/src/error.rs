//! Store error types for nk-store.

use thiserror::Error;

/// Errors from note storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document store returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Store error message, or the raw response body.
        message: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No bearer token could be obtained for the request.
    #[error("authentication error: {0}")]
    Auth(#[from] nk_auth::AuthError),

    /// The note to update does not exist.
    #[error("note not found: {id}")]
    NotFound { id: String },

    /// A stored record could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),
}
