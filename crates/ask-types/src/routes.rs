use std::fmt;

/// Views of the application, addressed by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
}

impl Route {
    pub const PROTECTED_PREFIX: &'static str = "/dashboard";

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }

    /// True for the views a signed-in user should be bounced away from.
    pub fn is_auth_entry(path: &str) -> bool {
        path == Self::Login.path() || path == Self::Register.path()
    }

    /// True for every path starting with `/dashboard`, including siblings
    /// such as `/dashboards`.
    pub fn is_protected(path: &str) -> bool {
        path.starts_with(Self::PROTECTED_PREFIX)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
