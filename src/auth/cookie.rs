//! Refresh cookie construction and Cookie header parsing.

use std::fmt;

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};

/// Default cookie name for the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = cookie_header.to_str() else {
            continue;
        };
        for part in cookie_header.split(';') {
            let part = part.trim();
            if let Some((key, value)) = part.split_once('=') {
                if key.trim() == name {
                    return Some(value.trim());
                }
            }
        }
    }
    None
}

/// Where and how the refresh cookie is scoped.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: REFRESH_COOKIE_NAME.to_string(),
            domain: "localhost".to_string(),
            path: "/".to_string(),
            secure: true,
        }
    }
}

impl CookieSettings {
    /// Cookie carrying `token` until `expires_at`.
    pub fn build_set_cookie(&self, token: &str, expires_at: u64, now: u64) -> RefreshCookie {
        RefreshCookie {
            name: self.name.clone(),
            value: token.to_string(),
            path: self.path.clone(),
            domain: self.domain.clone(),
            max_age: i64::try_from(expires_at.saturating_sub(now)).unwrap_or(i64::MAX),
            expires: expires_at,
            secure: self.secure,
        }
    }

    /// Cookie that tells the client to drop the refresh token immediately.
    pub fn build_expire_cookie(&self) -> RefreshCookie {
        RefreshCookie {
            name: self.name.clone(),
            value: String::new(),
            path: self.path.clone(),
            domain: self.domain.clone(),
            max_age: -1,
            expires: 0,
            secure: self.secure,
        }
    }

    /// The refresh token presented by the client, if any.
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        get_cookie(headers, &self.name).filter(|value| !value.is_empty())
    }
}

/// A `Set-Cookie` instruction for the refresh token. Always HttpOnly and
/// SameSite=Strict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    /// Negative means expire now
    pub max_age: i64,
    /// Unix seconds
    pub expires: u64,
    pub secure: bool,
}

impl fmt::Display for RefreshCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)?;
        if !self.domain.is_empty() {
            write!(f, "; Domain={}", self.domain)?;
        }
        let expires = i64::try_from(self.expires)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        write!(
            f,
            "; Max-Age={}; Expires={}; HttpOnly; SameSite=Strict",
            self.max_age,
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        )?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}
