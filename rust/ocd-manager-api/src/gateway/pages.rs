//! Page guard: keeps signed-out visitors off the app pages and signed-in
//! visitors off the login pages. API routes pass through untouched.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::auth::session_user;
use crate::AppState;

/// Pages that need a session, including everything below them.
pub const PROTECTED_PAGES: &[&str] = &["/dashboard", "/tracking", "/exercises", "/progress"];

/// Pages only useful without a session.
pub const AUTH_PAGES: &[&str] = &["/login", "/register"];

pub const LOGIN_PAGE: &str = "/login";
pub const HOME_PAGE: &str = "/dashboard";

/// Whether `path` is one of the protected pages or nested below one.
pub fn is_protected_page(path: &str) -> bool {
    PROTECTED_PAGES.iter().any(|page| {
        path.strip_prefix(page)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Whether `path` is a login or registration page.
pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGES
        .iter()
        .any(|page| path == *page || path.strip_suffix('/') == Some(page))
}

/// Redirect (303) between page groups based on the session cookie.
pub async fn page_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    let protected = is_protected_page(path);
    let auth_page = is_auth_page(path);

    if protected || auth_page {
        let signed_in = session_user(&jar, &state.config.auth).is_some();
        if protected && !signed_in {
            tracing::debug!(path, "Redirecting signed-out visitor to login");
            return Redirect::to(LOGIN_PAGE).into_response();
        }
        if auth_page && signed_in {
            tracing::debug!(path, "Redirecting signed-in visitor to dashboard");
            return Redirect::to(HOME_PAGE).into_response();
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_page_matching() {
        assert!(is_protected_page("/dashboard"));
        assert!(is_protected_page("/tracking/symptoms"));
        assert!(is_protected_page("/progress/"));
        assert!(!is_protected_page("/progressive"));
        assert!(!is_protected_page("/api/progress"));
        assert!(!is_protected_page("/"));
    }

    #[test]
    fn test_auth_page_matching() {
        assert!(is_auth_page("/login"));
        assert!(is_auth_page("/register/"));
        assert!(!is_auth_page("/login/help"));
        assert!(!is_auth_page("/api/auth/login"));
    }
}
