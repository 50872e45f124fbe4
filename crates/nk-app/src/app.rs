//! Router over the three views.
//!
//! [`App`] owns the gateways, the [`SessionContext`], and one instance of
//! each view. Protected routes go through [`guard`] every time the route or
//! the session changes.

use nk_auth::AuthGateway;
use nk_core::{Route, UserIdentity};
use nk_store::{NoteGateway, NoteStore};

use crate::effect::Effect;
use crate::guard::{Guard, guard};
use crate::session::{SessionContext, SessionState};
use crate::views::{HomeView, LoginView, SignUpView};

/// What the active route renders.
#[derive(Debug)]
pub enum Screen<'a> {
    /// Identity resolution pending on a protected route.
    Loading,
    Login(&'a LoginView),
    SignUp(&'a SignUpView),
    Home {
        identity: &'a UserIdentity,
        view: &'a HomeView,
    },
}

pub struct App<A, S> {
    auth: A,
    notes: NoteGateway<S>,
    session: SessionContext,
    state: SessionState,
    route: Route,
    pub login: LoginView,
    pub signup: SignUpView,
    pub home: HomeView,
}

impl<A: AuthGateway, S: NoteStore> App<A, S> {
    /// Start on `/`. Must be called inside a tokio runtime.
    pub fn new(auth: A, notes: NoteGateway<S>) -> Self {
        let session = SessionContext::init(auth.subscribe());
        let state = session.current();
        Self {
            auth,
            notes,
            session,
            state,
            route: Route::Home,
            login: LoginView::default(),
            signup: SignUpView::default(),
            home: HomeView::default(),
        }
    }

    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    /// Session snapshot as of the last [`sync`](Self::sync).
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn auth(&self) -> &A {
        &self.auth
    }

    #[must_use]
    pub const fn notes(&self) -> &NoteGateway<S> {
        &self.notes
    }

    #[must_use]
    pub fn screen(&self) -> Screen<'_> {
        match self.route {
            Route::Login => Screen::Login(&self.login),
            Route::SignUp => Screen::SignUp(&self.signup),
            Route::Home => match guard(&self.state) {
                Guard::Loading | Guard::RedirectToLogin => Screen::Loading,
                Guard::Allow(identity) => Screen::Home {
                    identity,
                    view: &self.home,
                },
            },
        }
    }

    /// Pick up identity changes and re-run the guard for the active route.
    pub async fn sync(&mut self) {
        self.session.settle().await;
        self.state = self.session.current();

        if guard(&self.state) == Guard::RedirectToLogin {
            self.home.reset();
        }
        if !self.route.is_protected() {
            return;
        }
        match guard(&self.state) {
            Guard::Loading => {}
            Guard::RedirectToLogin => {
                tracing::debug!(from = %self.route, "not signed in; redirecting to login");
                self.route = Route::Login;
            }
            Guard::Allow(identity) => {
                let identity = identity.clone();
                self.home.load(&self.notes, &identity).await;
            }
        }
    }

    /// Wait for the next identity change, then [`sync`](Self::sync).
    pub async fn wait_for_session(&mut self) {
        if self.session.changed().await.is_some() {
            self.sync().await;
        }
    }

    pub async fn navigate(&mut self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.route = route;
        self.sync().await;
    }

    /// Apply view effects. Returns the alerts for the UI binding to show.
    pub async fn apply(&mut self, effects: Vec<Effect>) -> Vec<String> {
        let mut alerts = Vec::new();
        for effect in effects {
            match effect {
                Effect::Alert(message) => alerts.push(message),
                Effect::Navigate(route) => self.route = route,
            }
        }
        self.sync().await;
        alerts
    }

    pub async fn submit_login(&mut self) -> Vec<String> {
        let effects = self.login.submit(&self.auth).await;
        self.apply(effects).await
    }

    pub async fn login_with_google(&mut self) -> Vec<String> {
        let effects = self.login.login_with_google(&self.auth).await;
        self.apply(effects).await
    }

    pub async fn submit_signup(&mut self) -> Vec<String> {
        let effects = self.signup.submit(&self.auth).await;
        self.apply(effects).await
    }

    pub async fn add_note(&mut self) {
        if self.allowed() {
            self.home.add(&self.notes).await;
        }
    }

    pub async fn delete_note(&mut self, note_id: &str) {
        if self.allowed() {
            self.home.delete(&self.notes, note_id).await;
        }
    }

    pub async fn close_editor(&mut self) {
        if self.allowed() {
            self.home.close(&self.notes).await;
        }
    }

    pub async fn refresh_notes(&mut self) {
        if self.allowed() {
            self.home.refresh(&self.notes).await;
        }
    }

    pub async fn logout(&mut self) -> Vec<String> {
        let effects = self.home.logout(&self.auth).await;
        self.apply(effects).await
    }

    /// Tear down the session subscription.
    pub fn shutdown(self) {
        self.session.teardown();
    }

    fn allowed(&self) -> bool {
        self.route == Route::Home && matches!(guard(&self.state), Guard::Allow(_))
    }
}
