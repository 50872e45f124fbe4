//! # nk-auth
//!
//! Firebase authentication for Notekeep.
//!
//! Provides email/password sign-up and sign-in against the Identity Toolkit
//! REST API, federated Google sign-in through the system browser
//! (`tiny_http` + `open`), session persistence in the OS keychain with a file
//! fallback (`keyring`), ID token refresh, and the identity-change stream the
//! session context subscribes to.

pub mod browser_flow;
pub mod error;
pub mod firebase;
pub mod gateway;
pub mod http;
pub mod refresh;
pub mod session;
pub mod session_store;
pub mod state;

pub use error::AuthError;
pub use firebase::FirebaseAuth;
pub use gateway::AuthGateway;
pub use session::StoredSession;
pub use session_store::SessionStore;
pub use state::{AuthState, IdentityFeed, IdentityStream};
