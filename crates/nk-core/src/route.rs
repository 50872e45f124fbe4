//! Client-side routes.

use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A navigable client route. `Home` is the only protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    SignUp,
    Home,
}

impl Route {
    /// Path the route is mounted at.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::SignUp => "/signup",
            Self::Home => "/",
        }
    }

    /// Whether the route requires an authenticated identity.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = CoreError;

    /// Accepts either the path (`/signup`) or the bare name (`signup`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "login" => Ok(Self::Login),
            "signup" => Ok(Self::SignUp),
            "" | "home" => Ok(Self::Home),
            other => Err(CoreError::Validation(format!("unknown route '{other}'"))),
        }
    }
}
