use nk_core::UserIdentity;

use crate::session::SessionState;

/// What a protected route should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard<'a> {
    /// Identity resolution is still pending; show a placeholder.
    Loading,
    RedirectToLogin,
    Allow(&'a UserIdentity),
}

#[must_use]
pub const fn guard(state: &SessionState) -> Guard<'_> {
    if state.loading {
        return Guard::Loading;
    }
    match &state.identity {
        Some(identity) => Guard::Allow(identity),
        None => Guard::RedirectToLogin,
    }
}
