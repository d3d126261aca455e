//! Session cookie formatting and extraction.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, TimeDelta, Utc};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "jwt";

/// Build a `Set-Cookie` value for the session token.
///
/// The cookie is always `HttpOnly` and `SameSite=None`; `Secure` is only set
/// in production.
pub fn session_cookie(token: &str, expires: DateTime<Utc>, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Expires={}; Path=/; HttpOnly; SameSite=None",
        SESSION_COOKIE,
        token,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Overwrite the session cookie with an empty value that expired at the epoch.
pub fn cleared_session_cookie(secure: bool) -> String {
    session_cookie("", DateTime::<Utc>::UNIX_EPOCH, secure)
}

/// Cookie expiry `days` from `now`, or `None` if the result is out of range.
pub fn expiry_after_days(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    now.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Read the session token from the request's `Cookie` headers.
///
/// Empty values (a cleared cookie echoed back) count as absent.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name.trim() == SESSION_COOKIE {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    #[test]
    fn test_session_cookie_attributes() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 15, 8, 30, 0).unwrap();
        let cookie = session_cookie("abc.def.ghi", expires, false);

        assert!(cookie.starts_with("jwt=abc.def.ghi;"));
        assert!(cookie.contains("Expires=Tue, 15 Jan 2030 08:30:00 GMT"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("abc.def.ghi", expires, true);
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_cleared_cookie_is_expired() {
        let cookie = cleared_session_cookie(true);
        assert!(cookie.starts_with("jwt=;"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn test_expiry_after_days() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let expires = expiry_after_days(now, 90).unwrap();
        assert_eq!((expires - now).num_hours(), 90 * 24);

        assert!(expiry_after_days(now, i64::MAX).is_none());
    }

    #[test]
    fn test_extract_session_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; jwt=abc.def.ghi; lang=en"),
        );
        assert_eq!(
            extract_session_token(&headers),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_ignores_similar_names_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("jwt_old=stale; notjwt=x"),
        );
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("jwt="));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn test_extract_across_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("jwt=token-2"));
        assert_eq!(extract_session_token(&headers), Some("token-2".to_string()));
    }
}
