//! Cross-cutting error types for Notekeep.
//!
//! Gateway-specific errors (`AuthError`, `StoreError`) are defined in their
//! respective crates. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Notekeep crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
