use ask_types::routes::Route;

/// Where a viewer at `path` must be sent instead, if anywhere.
///
/// Only token presence is consulted, not whether the token still resolves to
/// a user; a stale token is cleaned up by hydration.
pub fn guard(path: &str, has_token: bool) -> Option<Route> {
    if Route::is_protected(path) && !has_token {
        return Some(Route::Login);
    }
    if Route::is_auth_entry(path) && has_token {
        return Some(Route::Dashboard);
    }
    None
}
