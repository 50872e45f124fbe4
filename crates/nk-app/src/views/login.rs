use nk_auth::AuthGateway;
use nk_core::Route;

use crate::effect::Effect;

pub const LOGIN_FAILED: &str = "Login failed! Check Credentials";
pub const GOOGLE_LOGIN_FAILED: &str = "Google Login failed!";

/// Email/password form plus the federated sign-in button.
#[derive(Debug, Default)]
pub struct LoginView {
    pub email: String,
    pub password: String,
}

impl LoginView {
    pub async fn submit(&mut self, auth: &impl AuthGateway) -> Vec<Effect> {
        match auth.login_with_email(&self.email, &self.password).await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, "logged in");
                vec![Effect::Navigate(Route::Home)]
            }
            Err(error) => {
                tracing::error!(%error, "login failed");
                vec![Effect::alert(LOGIN_FAILED)]
            }
        }
    }

    pub async fn login_with_google(&mut self, auth: &impl AuthGateway) -> Vec<Effect> {
        match auth.login_with_federated_provider().await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, "logged in with Google");
                vec![Effect::Navigate(Route::Home)]
            }
            Err(error) => {
                tracing::error!(%error, "Google login failed");
                vec![Effect::alert(GOOGLE_LOGIN_FAILED)]
            }
        }
    }

    #[must_use]
    pub fn go_to_signup(&self) -> Vec<Effect> {
        vec![Effect::Navigate(Route::SignUp)]
    }
}
