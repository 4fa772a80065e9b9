//! One-shot flash messages carried in a cookie across a redirect.
//!
//! A mutating handler calls [`push_flash`] before answering `303 See Other`;
//! the next page handler calls [`take_flash`], which returns the message and
//! clears the cookie. The cookie value is JSON; `CookieJar` percent-encodes
//! it on the way out and decodes it on the way in.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

/// Cookie name for the pending flash message.
pub const FLASH_COOKIE: &str = "cinema_flash";

/// Lifetime of an unread flash message.
pub const FLASH_MAX_AGE_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }
}

/// Queue `flash` for the next page view, replacing any pending message.
pub fn push_flash(jar: CookieJar, flash: FlashMessage) -> CookieJar {
    let value = match serde_json::to_string(&flash) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode flash message");
            return jar;
        }
    };
    let cookie = Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .max_age(Duration::seconds(FLASH_MAX_AGE_SECS))
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read the pending flash message, if any, and clear it.
///
/// An unreadable cookie is cleared and treated as absent.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<FlashMessage>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = serde_json::from_str::<FlashMessage>(cookie.value()).ok();
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}
