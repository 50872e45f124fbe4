//! Session-wide view of the authenticated identity.
//!
//! [`SessionContext`] subscribes to the provider's identity stream once and
//! keeps the latest [`SessionState`] for synchronous polling. It is created
//! by whoever owns the client session and handed to the router; there is no
//! global instance.

use nk_auth::{AuthState, IdentityStream};
use nk_core::UserIdentity;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identity plus whether it is still being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<UserIdentity>,
    pub loading: bool,
}

impl SessionState {
    /// State before the provider has reported anything.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }
}

impl From<&AuthState> for SessionState {
    fn from(state: &AuthState) -> Self {
        match state {
            AuthState::Unresolved => Self::loading(),
            AuthState::SignedOut => Self {
                identity: None,
                loading: false,
            },
            AuthState::SignedIn(identity) => Self {
                identity: Some(identity.clone()),
                loading: false,
            },
        }
    }
}

pub struct SessionContext {
    state: watch::Receiver<SessionState>,
    source: IdentityStream,
    task: JoinHandle<()>,
}

impl SessionContext {
    /// Subscribe to `stream` and start forwarding its changes.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn init(stream: IdentityStream) -> Self {
        let source = stream.clone();
        let (tx, rx) = watch::channel(SessionState::from(&stream.current()));
        let task = tokio::spawn(forward(stream, tx));
        Self {
            state: rx,
            source,
            task,
        }
    }

    /// Latest state, without waiting.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Wait for the next update. `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Wait until every identity change published so far has been applied.
    pub async fn settle(&mut self) {
        loop {
            let latest = SessionState::from(&self.source.current());
            if *self.state.borrow_and_update() == latest {
                return;
            }
            if self.state.changed().await.is_err() {
                return;
            }
        }
    }

    /// Stop listening for identity changes.
    pub fn teardown(self) {
        tracing::debug!("session context torn down");
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn forward(mut stream: IdentityStream, tx: watch::Sender<SessionState>) {
    while let Some(state) = stream.changed().await {
        if tx.send(SessionState::from(&state)).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use nk_auth::IdentityFeed;
    use pretty_assertions::assert_eq;

    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            uid: "u1".into(),
            email: "ada@example.com".into(),
            photo_url: None,
            display_name: None,
        }
    }

    #[tokio::test]
    async fn starts_loading_until_provider_reports() {
        let feed = IdentityFeed::new();
        let ctx = SessionContext::init(feed.subscribe());
        assert_eq!(ctx.current(), SessionState::loading());
    }

    #[tokio::test]
    async fn notification_replaces_identity_and_clears_loading() {
        let feed = IdentityFeed::new();
        let mut ctx = SessionContext::init(feed.subscribe());

        feed.publish(AuthState::SignedIn(identity()));
        let state = ctx.changed().await.unwrap();
        assert_eq!(state.identity, Some(identity()));
        assert!(!state.loading);

        feed.publish(AuthState::SignedOut);
        ctx.settle().await;
        assert_eq!(
            ctx.current(),
            SessionState {
                identity: None,
                loading: false
            }
        );
    }

    #[tokio::test]
    async fn settle_is_immediate_when_up_to_date() {
        let feed = IdentityFeed::new();
        feed.publish(AuthState::SignedOut);
        let mut ctx = SessionContext::init(feed.subscribe());
        ctx.settle().await;
        assert!(!ctx.current().loading);
    }
}
