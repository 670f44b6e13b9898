use super::SessionId;

/// Path of the login view the client is sent to when a session cannot be
/// recovered.
pub const LOGIN_PATH: &str = "/login";

/// Builds the `Authorization` header value for a session.
pub fn bearer_header(session_id: &SessionId) -> String {
    format!("Bearer {}", session_id.as_str())
}

/// Builds the login redirect that brings the user back to `current` after
/// signing in.
///
/// ```
/// use planhaus_core::auth::login_redirect_path;
///
/// assert_eq!(
///     login_redirect_path("/projects/1/budget?tab=items"),
///     "/login?returnTo=%2Fprojects%2F1%2Fbudget%3Ftab%3Ditems"
/// );
/// ```
pub fn login_redirect_path(current: &str) -> String {
    match validate_return_to(current.trim()) {
        Some(path) if path != "/" && !is_login_path(path) => {
            format!("{}?returnTo={}", LOGIN_PATH, urlencoding::encode(path))
        }
        _ => LOGIN_PATH.to_string(),
    }
}

/// True for the login view itself, with or without a query or subpath.
fn is_login_path(path: &str) -> bool {
    match path.strip_prefix(LOGIN_PATH) {
        Some(rest) => rest.is_empty() || rest.starts_with(['?', '/', '#']),
        None => false,
    }
}

/// Accepts a return path only if it is a plain relative path, so the login
/// view can never be used as an open redirect.
///
/// ```
/// use planhaus_core::auth::validate_return_to;
///
/// assert_eq!(validate_return_to("/budget"), Some("/budget"));
/// assert_eq!(validate_return_to("//evil.com"), None);
/// assert_eq!(validate_return_to("https://evil.com"), None);
/// ```
pub fn validate_return_to(path: &str) -> Option<&str> {
    if !path.starts_with('/') || path.starts_with("//") {
        return None;
    }
    if path.chars().any(|c| c.is_control()) || path.contains("://") {
        return None;
    }
    Some(path)
}
