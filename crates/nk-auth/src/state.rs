//! Identity-change notifications.
//!
//! The provider owns an [`IdentityFeed`]; every sign-in, sign-out, and the
//! startup restore publish the latest [`AuthState`]. Subscribers hold an
//! [`IdentityStream`], a single "latest identity" cursor backed by a
//! `tokio::sync::watch` channel. Intermediate states may be skipped; the
//! latest one is never lost.

use nk_core::UserIdentity;
use tokio::sync::watch;

/// Authentication state as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The persisted session has not been inspected yet.
    Unresolved,
    SignedOut,
    SignedIn(UserIdentity),
}

impl AuthState {
    #[must_use]
    pub const fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Unresolved | Self::SignedOut => None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Publishing side of the identity-change stream.
#[derive(Debug)]
pub struct IdentityFeed {
    tx: watch::Sender<AuthState>,
}

impl Default for IdentityFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityFeed {
    /// Create a feed whose initial state is [`AuthState::Unresolved`].
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::Unresolved);
        Self { tx }
    }

    /// Replace the current state and wake every subscriber.
    pub fn publish(&self, state: AuthState) {
        tracing::debug!(signed_in = state.identity().is_some(), "identity changed");
        self.tx.send_replace(state);
    }

    #[must_use]
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> IdentityStream {
        IdentityStream {
            rx: self.tx.subscribe(),
        }
    }
}

/// Subscribing side of the identity-change stream.
#[derive(Debug, Clone)]
pub struct IdentityStream {
    rx: watch::Receiver<AuthState>,
}

impl IdentityStream {
    /// Latest published state, without waiting.
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Wait for the next change and return the new state.
    ///
    /// Returns `None` once the provider side has been dropped.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
