//! Helpers for asserting on flash-message cookies.

use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::Cookie;
use cinema_core::flash::{FLASH_COOKIE, FlashMessage};

/// Decode the flash message set by a response, if any.
///
/// Removal cookies (empty value) are ignored.
pub fn flash_from_headers(headers: &HeaderMap) -> Option<FlashMessage> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|raw| Cookie::parse_encoded(raw.to_owned()).ok())
        .filter(|cookie| cookie.name() == FLASH_COOKIE && !cookie.value().is_empty())
        .find_map(|cookie| serde_json::from_str(cookie.value()).ok())
}

/// `Cookie` request header value carrying `flash`, as a browser would send it
/// back after a redirect.
pub fn flash_request_cookie(flash: &FlashMessage) -> String {
    let value = serde_json::to_string(flash).unwrap();
    Cookie::new(FLASH_COOKIE, value).encoded().to_string()
}

/// Whether the response clears the flash cookie.
pub fn clears_flash(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|raw| Cookie::parse_encoded(raw.to_owned()).ok())
        .any(|cookie| cookie.name() == FLASH_COOKIE && cookie.value().is_empty())
}
