//! Session token generation and the signed session cookie.
//!
//! The cookie value is `<token>.<hmac>` where `hmac` is the hex HMAC-SHA256 of
//! the token under `AUTH_SECRET`. Only the bare token is stored in the database.

use axum::http::{header, HeaderMap};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE_NAME: &str = "launchpad.session_token";

/// Random bytes in a session or verification token
const TOKEN_BYTES: usize = 32;

/// Generate a fresh opaque token (hex of 32 random bytes).
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

fn signature(token: &str, secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(token.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Produce the cookie value for `token`.
pub fn sign_token(token: &str, secret: &str) -> String {
    match signature(token, secret) {
        Some(sig) => format!("{}.{}", token, sig),
        // HMAC-SHA256 accepts keys of any length.
        None => token.to_string(),
    }
}

/// Check a cookie value and return the bare token when the signature matches.
pub fn verify_signed_token<'a>(value: &'a str, secret: &str) -> Option<&'a str> {
    let (token, provided) = value.rsplit_once('.')?;
    if token.is_empty() || provided.is_empty() {
        return None;
    }

    let expected = signature(token, secret)?;
    let matches: bool = expected.as_bytes().ct_eq(provided.as_bytes()).into();
    matches.then_some(token)
}

/// Read a cookie by name from the `Cookie` request header(s).
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// Bare session token from the request, if the cookie is present and correctly signed.
pub fn session_token_from_headers<'a>(headers: &'a HeaderMap, secret: &str) -> Option<&'a str> {
    let value = read_cookie(headers, SESSION_COOKIE_NAME)?;
    verify_signed_token(value, secret)
}

/// `Set-Cookie` value that stores a signed session token.
pub fn session_cookie(token: &str, secret: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        SESSION_COOKIE_NAME,
        sign_token(token, secret),
        max_age_secs.max(0),
        secure_flag
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{}",
        SESSION_COOKIE_NAME, secure_flag
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_generated_tokens_are_hex_and_unique() {
        let first = generate_token();
        let second = generate_token();
        assert_eq!(first.len(), TOKEN_BYTES * 2);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_signed_token_verifies() {
        let token = generate_token();
        let signed = sign_token(&token, SECRET);
        assert_eq!(verify_signed_token(&signed, SECRET), Some(token.as_str()));
    }

    #[test]
    fn test_tampered_or_foreign_signatures_are_rejected() {
        let signed = sign_token("abc123", SECRET);
        assert!(verify_signed_token(&signed, "another-secret-another-secret-xx").is_none());

        let tampered = signed.replacen("abc123", "abc124", 1);
        assert!(verify_signed_token(&tampered, SECRET).is_none());

        assert!(verify_signed_token("abc123", SECRET).is_none());
        assert!(verify_signed_token(".deadbeef", SECRET).is_none());
        assert!(verify_signed_token("abc123.", SECRET).is_none());
    }

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; launchpad.session_token=tok.sig ; other=1"),
        );
        assert_eq!(read_cookie(&headers, SESSION_COOKIE_NAME), Some("tok.sig"));
        assert_eq!(read_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_session_token_from_headers() {
        let signed = sign_token("session-token", SECRET);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE_NAME, signed)).unwrap(),
        );
        assert_eq!(
            session_token_from_headers(&headers, SECRET),
            Some("session-token")
        );
        assert_eq!(session_token_from_headers(&HeaderMap::new(), SECRET), None);
    }

    #[test]
    fn test_cookie_flags() {
        let cookie = session_cookie("tok", SECRET, 3600, false);
        assert!(cookie.starts_with("launchpad.session_token=tok."));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        assert!(session_cookie("tok", SECRET, 3600, true).ends_with("; Secure"));

        let cleared = clear_session_cookie(false);
        assert!(cleared.starts_with("launchpad.session_token=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
