// ABOUTME: Session cookie helpers
// ABOUTME: Reads the access token from a Cookie header and builds Set-Cookie values

/// Default cookie carrying the provider access token
pub const DEFAULT_COOKIE_NAME: &str = "sb-access-token";

/// Find the value of cookie `name` in a `Cookie` request header
pub fn token_from_cookie_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
        .and_then(|value| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
}

/// `Set-Cookie` value that stores the session token
pub fn session_cookie(name: &str, token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name,
        urlencoding::encode(token),
        max_age_secs.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session token
pub fn clear_session_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}
