use nk_auth::AuthGateway;
use nk_core::Route;

use crate::effect::Effect;

pub const SIGNUP_SUCCEEDED: &str = "Signed Up! Log in now";
pub const SIGNUP_FAILED: &str = "Signed Up failed! Try again later";

#[derive(Debug, Default)]
pub struct SignUpView {
    pub email: String,
    pub password: String,
}

impl SignUpView {
    /// Create the account, then send the user to the login page.
    pub async fn submit(&mut self, auth: &impl AuthGateway) -> Vec<Effect> {
        match auth.sign_up(&self.email, &self.password).await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, "signed up");
                vec![
                    Effect::alert(SIGNUP_SUCCEEDED),
                    Effect::Navigate(Route::Login),
                ]
            }
            Err(error) => {
                tracing::error!(%error, "sign-up failed");
                vec![Effect::alert(SIGNUP_FAILED)]
            }
        }
    }

    #[must_use]
    pub fn go_to_login(&self) -> Vec<Effect> {
        vec![Effect::Navigate(Route::Login)]
    }
}
