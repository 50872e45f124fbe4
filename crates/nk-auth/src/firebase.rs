//! Firebase Identity Toolkit client.
//!
//! Talks to the REST API directly (`accounts:signUp`,
//! `accounts:signInWithPassword`, `accounts:signInWithIdp`), keeps the signed-in
//! session in memory and in the [`SessionStore`], and publishes every identity
//! change on its [`IdentityFeed`].

use std::sync::Arc;
use std::time::Duration;

use nk_config::{FirebaseConfig, NkConfig, OAuthConfig};
use nk_core::UserIdentity;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::browser_flow;
use crate::error::AuthError;
use crate::gateway::AuthGateway;
use crate::http::check_response;
use crate::refresh::{EXPIRY_BUFFER_SECS, refresh_session, token_expiry};
use crate::session::StoredSession;
use crate::session_store::SessionStore;
use crate::state::{AuthState, IdentityFeed, IdentityStream};

/// Identity provider used for `signInWithIdp`.
const GOOGLE_PROVIDER_ID: &str = "google.com";

/// Sign-in response shared by the `accounts:*` endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

impl SignInResponse {
    fn identity(&self) -> UserIdentity {
        UserIdentity {
            uid: self.local_id.clone(),
            email: self.email.clone(),
            photo_url: self.photo_url.clone().filter(|s| !s.is_empty()),
            display_name: self.display_name.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

/// Firebase-backed [`AuthGateway`]. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct FirebaseAuth {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    firebase: FirebaseConfig,
    oauth: OAuthConfig,
    store: Option<SessionStore>,
    session: Mutex<Option<StoredSession>>,
    feed: IdentityFeed,
}

impl FirebaseAuth {
    /// Build a client from the loaded configuration.
    ///
    /// Sessions are persisted under `session.keyring_service` unless
    /// `session.persist` is off.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the session file location cannot
    /// be resolved, or `AuthError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &NkConfig) -> Result<Self, AuthError> {
        let store = if config.session.persist {
            Some(SessionStore::new(&config.session.keyring_service)?)
        } else {
            None
        };
        Self::new(config.firebase.clone(), config.oauth.clone(), store)
    }

    /// # Errors
    ///
    /// Returns `AuthError::Http` if the HTTP client cannot be built.
    pub fn new(
        firebase: FirebaseConfig,
        oauth: OAuthConfig,
        store: Option<SessionStore>,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(firebase.request_timeout_secs))
            .build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                firebase,
                oauth,
                store,
                session: Mutex::new(None),
                feed: IdentityFeed::new(),
            }),
        })
    }

    /// Resolve the persisted session at startup and publish the result.
    ///
    /// A stored session close to expiry is refreshed first. A refresh the
    /// provider rejects drops the session; a transport failure keeps it so
    /// the next [`id_token`](Self::id_token) call can retry. Never fails.
    pub async fn restore(&self) -> AuthState {
        let stored = self.inner.store.as_ref().and_then(SessionStore::load);
        let Some(stored) = stored else {
            tracing::debug!("no stored session");
            self.inner.feed.publish(AuthState::SignedOut);
            return AuthState::SignedOut;
        };

        let session = if stored.is_near_expiry(EXPIRY_BUFFER_SECS) {
            match self.refresh(&stored).await {
                Ok(fresh) => fresh,
                Err(error @ AuthError::Http(_)) => {
                    tracing::warn!(%error, "session refresh failed; keeping stored session");
                    stored
                }
                Err(error) => {
                    tracing::warn!(%error, "stored session rejected; signing out");
                    self.forget_stored();
                    self.inner.feed.publish(AuthState::SignedOut);
                    return AuthState::SignedOut;
                }
            }
        } else {
            stored
        };

        let state = AuthState::SignedIn(session.identity.clone());
        *self.inner.session.lock().await = Some(session);
        self.inner.feed.publish(state.clone());
        state
    }

    /// A bearer token for the document store, refreshed when near expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` when signed out, or the refresh
    /// error when the token could not be renewed.
    pub async fn id_token(&self) -> Result<String, AuthError> {
        let mut guard = self.inner.session.lock().await;
        let session = guard.as_ref().ok_or(AuthError::NotAuthenticated)?;
        if !session.is_near_expiry(EXPIRY_BUFFER_SECS) {
            return Ok(session.id_token.clone());
        }

        let fresh = self.refresh(session).await?;
        self.persist(&fresh);
        let token = fresh.id_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.inner.firebase.auth_url,
            urlencoding::encode(&self.inner.firebase.api_key)
        )
    }

    async fn call(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        tracing::debug!(method, "identity toolkit request");
        let resp = self
            .inner
            .http
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await?;
        check_response(resp).await
    }

    async fn refresh(&self, session: &StoredSession) -> Result<StoredSession, AuthError> {
        refresh_session(
            &self.inner.http,
            &self.inner.firebase.token_url,
            &self.inner.firebase.api_key,
            session,
        )
        .await
    }

    /// Fill in profile fields the sign-in response left out.
    ///
    /// Best-effort: lookup failures keep the identity as it is.
    async fn complete_profile(&self, identity: &mut UserIdentity, id_token: &str) {
        if identity.photo_url.is_some() && identity.display_name.is_some() {
            return;
        }
        let lookup = async {
            let resp = self.call("lookup", &json!({ "idToken": id_token })).await?;
            resp.json::<LookupResponse>()
                .await
                .map_err(AuthError::from)
        };
        match lookup.await {
            Ok(LookupResponse { users }) => {
                if let Some(user) = users.into_iter().next() {
                    identity.photo_url = identity
                        .photo_url
                        .take()
                        .or(user.photo_url.filter(|s| !s.is_empty()));
                    identity.display_name = identity
                        .display_name
                        .take()
                        .or(user.display_name.filter(|s| !s.is_empty()));
                }
            }
            Err(error) => tracing::debug!(%error, "profile lookup failed"),
        }
    }

    /// Adopt a fresh sign-in: keep it in memory, persist it, and publish it.
    async fn establish(&self, resp: SignInResponse) -> Result<UserIdentity, AuthError> {
        let mut identity = resp.identity();
        self.complete_profile(&mut identity, &resp.id_token).await;

        let session = StoredSession {
            identity: identity.clone(),
            expires_at: token_expiry(&resp.id_token, &resp.expires_in)?,
            id_token: resp.id_token,
            refresh_token: resp.refresh_token,
        };
        self.persist(&session);
        *self.inner.session.lock().await = Some(session);

        tracing::info!(uid = %identity.uid, "signed in");
        self.inner
            .feed
            .publish(AuthState::SignedIn(identity.clone()));
        Ok(identity)
    }

    fn persist(&self, session: &StoredSession) {
        if let Some(store) = &self.inner.store {
            if let Err(error) = store.store(session) {
                tracing::warn!(%error, "failed to persist session");
            }
        }
    }

    fn forget_stored(&self) {
        if let Some(store) = &self.inner.store {
            if let Err(error) = store.delete() {
                tracing::warn!(%error, "failed to delete stored session");
            }
        }
    }
}

impl AuthGateway for FirebaseAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let resp = self
            .call(
                "signUp",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        let body: SignInResponse = resp.json().await?;
        self.establish(body).await
    }

    async fn login_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserIdentity, AuthError> {
        let resp = self
            .call(
                "signInWithPassword",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        let body: SignInResponse = resp.json().await?;
        self.establish(body).await
    }

    async fn login_with_federated_provider(&self) -> Result<UserIdentity, AuthError> {
        let google_token = browser_flow::authorize(&self.inner.http, &self.inner.oauth).await?;
        let post_body = crate::http::form_body(&[
            ("id_token", &google_token),
            ("providerId", GOOGLE_PROVIDER_ID),
        ]);
        let resp = self
            .call(
                "signInWithIdp",
                &json!({
                    "postBody": post_body,
                    "requestUri": "http://localhost",
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;
        let body: SignInResponse = resp.json().await?;
        self.establish(body).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        if let Some(store) = &self.inner.store {
            store.delete()?;
        }
        let previous = self.inner.session.lock().await.take();
        if let Some(session) = previous {
            tracing::info!(uid = %session.identity.uid, "signed out");
        }
        self.inner.feed.publish(AuthState::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> IdentityStream {
        self.inner.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            uid: "uid-1".into(),
            email: "ada@example.com".into(),
            photo_url: None,
            display_name: None,
        }
    }

    fn session(expires_in: TimeDelta) -> StoredSession {
        StoredSession {
            identity: identity(),
            id_token: "id-token".into(),
            refresh_token: "refresh-token".into(),
            expires_at: Utc::now() + expires_in,
        }
    }

    fn auth_with_store(dir: &TempDir) -> (FirebaseAuth, SessionStore) {
        let store = SessionStore::file_only(dir.path().join("session.json"));
        let auth = FirebaseAuth::new(
            FirebaseConfig::default(),
            OAuthConfig::default(),
            Some(store.clone()),
        )
        .unwrap();
        (auth, store)
    }

    #[test]
    fn sign_in_response_maps_to_identity() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "ada@example.com",
            "displayName": "",
            "idToken": "tok",
            "registered": true,
            "refreshToken": "ref",
            "expiresIn": "3600"
        }"#;
        let resp: SignInResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.identity(), identity());
        assert_eq!(resp.expires_in, "3600");
    }

    #[test]
    fn idp_response_keeps_photo() {
        let body = r#"{
            "federatedId": "https://accounts.google.com/1234",
            "providerId": "google.com",
            "localId": "uid-2",
            "email": "grace@example.com",
            "photoUrl": "https://lh3.googleusercontent.com/a/photo",
            "displayName": "Grace",
            "idToken": "tok",
            "refreshToken": "ref",
            "expiresIn": "3600"
        }"#;
        let resp: SignInResponse = serde_json::from_str(body).unwrap();
        let identity = resp.identity();
        assert_eq!(
            identity.photo_url.as_deref(),
            Some("https://lh3.googleusercontent.com/a/photo")
        );
        assert_eq!(identity.display_name.as_deref(), Some("Grace"));
    }

    #[test]
    fn endpoint_carries_api_key() {
        let firebase = FirebaseConfig {
            api_key: "key with space".into(),
            ..Default::default()
        };
        let auth = FirebaseAuth::new(firebase, OAuthConfig::default(), None).unwrap();
        assert_eq!(
            auth.endpoint("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=key%20with%20space"
        );
    }

    #[tokio::test]
    async fn restore_without_session_signs_out() {
        let dir = TempDir::new().unwrap();
        let (auth, _store) = auth_with_store(&dir);
        let stream = auth.subscribe();
        assert_eq!(stream.current(), AuthState::Unresolved);

        assert_eq!(auth.restore().await, AuthState::SignedOut);
        assert_eq!(stream.current(), AuthState::SignedOut);
    }

    #[tokio::test]
    async fn restore_adopts_fresh_session() {
        let dir = TempDir::new().unwrap();
        let (auth, store) = auth_with_store(&dir);
        store.store(&session(TimeDelta::hours(1))).unwrap();

        assert_eq!(auth.restore().await, AuthState::SignedIn(identity()));
        assert_eq!(auth.id_token().await.unwrap(), "id-token");
        assert_eq!(auth.subscribe().current(), AuthState::SignedIn(identity()));
    }

    #[tokio::test]
    async fn id_token_requires_sign_in() {
        let auth =
            FirebaseAuth::new(FirebaseConfig::default(), OAuthConfig::default(), None).unwrap();
        let err = auth.id_token().await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));
    }

    #[tokio::test]
    async fn logout_clears_session_and_publishes() {
        let dir = TempDir::new().unwrap();
        let (auth, store) = auth_with_store(&dir);
        store.store(&session(TimeDelta::hours(1))).unwrap();
        auth.restore().await;

        let mut stream = auth.subscribe();
        auth.logout().await.unwrap();

        assert_eq!(stream.changed().await, Some(AuthState::SignedOut));
        assert!(store.load().is_none());
        assert!(matches!(
            auth.id_token().await.unwrap_err(),
            AuthError::NotAuthenticated
        ));
    }
}
