use std::future::Future;

use nk_core::UserIdentity;

use crate::error::AuthError;
use crate::state::IdentityStream;

/// Identity provider operations used by the views.
///
/// Every operation resolves to the provider's identity or fails with the
/// provider's error, unvalidated and unretried. Successful calls also publish
/// the new [`AuthState`](crate::AuthState) to every [`IdentityStream`].
pub trait AuthGateway: Send + Sync {
    /// Create an account. The new user is signed in on success.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserIdentity, AuthError>> + Send;

    fn login_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserIdentity, AuthError>> + Send;

    /// Sign in through the system browser with the federated provider.
    fn login_with_federated_provider(
        &self,
    ) -> impl Future<Output = Result<UserIdentity, AuthError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Identity-change notifications, starting from the current state.
    fn subscribe(&self) -> IdentityStream;
}
