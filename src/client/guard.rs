use super::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PATH: &str = "/admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    /// Roster view; requires an authenticated session.
    Admin,
    /// Anything reachable without a session.
    Public,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            LOGIN_PATH => Route::Login,
            p if p == ADMIN_PATH || p.starts_with("/admin/") => Route::Admin,
            _ => Route::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Navigate to `to`, replacing the current history entry.
    Redirect { to: &'static str, replace: bool },
}

/// Decides navigation purely from the session; no side effects.
pub fn check(route: Route, session: &Session) -> Access {
    match (route, session.is_authenticated) {
        (Route::Admin, false) => Access::Redirect {
            to: LOGIN_PATH,
            replace: true,
        },
        (Route::Login, true) => Access::Redirect {
            to: ADMIN_PATH,
            replace: true,
        },
        _ => Access::Allow,
    }
}
