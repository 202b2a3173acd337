//! Session cookie handling.
//!
//! The cookie carries the HS256 session token and nothing else. It is
//! http-only, `SameSite=Lax` and scoped to the whole site.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, header};

pub const SESSION_COOKIE: &str = "papeleria_session";

/// Session token from the `Cookie` header, if present.
pub fn read_session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

pub fn session_cookie(token: &str, max_age: Duration) -> HeaderValue {
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    );
    // JWTs are base64url segments joined by dots: always a valid header value.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| expired_cookie())
}

pub fn expired_cookie() -> HeaderValue {
    HeaderValue::from_static("papeleria_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; papeleria_session=abc.def.ghi; lang=es"));
        assert_eq!(read_session_cookie(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_or_missing_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(read_session_cookie(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("papeleria_session="));
        assert_eq!(read_session_cookie(&headers), None);
    }

    #[test]
    fn cookie_attributes() {
        let value = session_cookie("a.b.c", Duration::from_secs(60));
        let text = value.to_str().unwrap();
        assert!(text.starts_with("papeleria_session=a.b.c;"));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("SameSite=Lax"));
        assert!(text.ends_with("Max-Age=60"));
        assert!(expired_cookie().to_str().unwrap().ends_with("Max-Age=0"));
    }
}
