//! Test doubles: an in-process identity provider and a call-counting store.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use nk_app::App;
use nk_auth::{AuthError, AuthGateway, AuthState, IdentityFeed, IdentityStream};
use nk_core::{Note, NoteFields, UserIdentity};
use nk_store::{LocalStore, NoteGateway, NoteStore, StoreError};

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse";
pub const TAKEN_EMAIL: &str = "taken@example.com";

pub fn ada() -> UserIdentity {
    UserIdentity {
        uid: "uid-ada".into(),
        email: EMAIL.into(),
        photo_url: Some("https://example.com/ada.png".into()),
        display_name: None,
    }
}

/// Identity provider that accepts one account and publishes like the real one.
pub struct FakeAuth {
    feed: IdentityFeed,
    pub federated_allowed: bool,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self {
            feed: IdentityFeed::new(),
            federated_allowed: true,
        }
    }

    pub fn signed_in() -> Self {
        let auth = Self::new();
        auth.feed.publish(AuthState::SignedIn(ada()));
        auth
    }

    pub fn signed_out() -> Self {
        let auth = Self::new();
        auth.feed.publish(AuthState::SignedOut);
        auth
    }

    pub fn publish(&self, state: AuthState) {
        self.feed.publish(state);
    }

    fn sign_in(&self, identity: UserIdentity) -> UserIdentity {
        self.feed.publish(AuthState::SignedIn(identity.clone()));
        identity
    }
}

fn provider(message: &str) -> AuthError {
    AuthError::Provider {
        code: 400,
        message: message.into(),
    }
}

impl AuthGateway for FakeAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        if email == TAKEN_EMAIL {
            return Err(provider("EMAIL_EXISTS"));
        }
        if password.len() < 6 {
            return Err(provider("WEAK_PASSWORD : Password should be at least 6 characters"));
        }
        Ok(self.sign_in(UserIdentity {
            uid: format!("uid-{email}"),
            email: email.into(),
            photo_url: None,
            display_name: None,
        }))
    }

    async fn login_with_email(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        if email == EMAIL && password == PASSWORD {
            Ok(self.sign_in(ada()))
        } else {
            Err(provider("INVALID_LOGIN_CREDENTIALS"))
        }
    }

    async fn login_with_federated_provider(&self) -> Result<UserIdentity, AuthError> {
        if self.federated_allowed {
            Ok(self.sign_in(ada()))
        } else {
            Err(AuthError::BrowserFlowFailed(
                "consent was not granted: access_denied".into(),
            ))
        }
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.feed.publish(AuthState::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> IdentityStream {
        self.feed.subscribe()
    }
}

/// Local store that counts calls per operation.
pub struct CountingStore {
    inner: LocalStore,
    inserts: AtomicUsize,
    queries: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    last_update: std::sync::Mutex<Option<NoteFields>>,
}

impl CountingStore {
    pub async fn new() -> Self {
        Self {
            inner: LocalStore::open(":memory:").await.unwrap(),
            inserts: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            last_update: std::sync::Mutex::new(None),
        }
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn inner_conn(&self) -> &libsql::Connection {
        self.inner.conn()
    }

    pub fn last_update(&self) -> Option<NoteFields> {
        self.last_update.lock().unwrap().clone()
    }
}

impl NoteStore for CountingStore {
    async fn insert(&self, owner_id: &str, fields: &NoteFields) -> Result<Note, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(owner_id, fields).await
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Note>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query_by_owner(owner_id).await
    }

    async fn update(&self, note_id: &str, fields: &NoteFields) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().unwrap() = Some(fields.clone());
        self.inner.update(note_id, fields).await
    }

    async fn delete(&self, note_id: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(note_id).await
    }
}

pub type TestApp = App<FakeAuth, CountingStore>;

/// App for a user who is already signed in, synced onto the Home route.
pub async fn signed_in_app() -> TestApp {
    let mut app = App::new(FakeAuth::signed_in(), NoteGateway::new(CountingStore::new().await));
    app.sync().await;
    app
}

pub fn store(app: &TestApp) -> &CountingStore {
    app.notes().store()
}
