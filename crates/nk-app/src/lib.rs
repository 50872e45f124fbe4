//! # nk-app
//!
//! Client-side application logic for Notekeep, independent of any UI.
//!
//! - [`SessionContext`]: the latest authenticated identity, fed by the
//!   identity provider's change stream
//! - [`guard`]: decides what a protected route renders
//! - [`App`]: router holding the session and the views
//! - [`views`]: Login, Sign-Up, and Home as headless state machines

pub mod app;
pub mod effect;
pub mod guard;
pub mod session;
pub mod views;

pub use app::{App, Screen};
pub use effect::Effect;
pub use guard::{Guard, guard};
pub use session::{SessionContext, SessionState};
