//! # nk-core
//!
//! Core types and error types for Notekeep.
//!
//! This crate provides the foundational types shared across all Notekeep crates:
//! - The authenticated [`UserIdentity`] issued by the identity provider
//! - The [`Note`] entity and its write payload [`NoteFields`]
//! - Navigable client routes
//! - Cross-cutting error types

pub mod entities;
pub mod errors;
pub mod identity;
pub mod route;

pub use entities::{DEFAULT_TITLE, EMPTY_CONTENT, Note, NoteFields};
pub use errors::CoreError;
pub use identity::UserIdentity;
pub use route::Route;
