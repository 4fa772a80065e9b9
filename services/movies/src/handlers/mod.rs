//! HTTP handlers.
//!
//! GET pages answer with a JSON page context: the page fields plus the
//! pending flash `message`, which is consumed on read. Form posts answer
//! `303 See Other`, queueing a flash for the page they redirect to.

pub mod account;
pub mod health;
pub mod movie;
pub mod petition;
pub mod rating;
pub mod review;
pub mod trending;

use axum::Json;
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use cinema_auth_types::identity::IdentityHeaders;
use cinema_core::flash::{FlashMessage, push_flash, take_flash};

use crate::domain::types::Actor;
use crate::error::MoviesServiceError;

impl From<IdentityHeaders> for Actor {
    fn from(identity: IdentityHeaders) -> Self {
        Actor {
            user_id: identity.user_id,
            role: identity.user_role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub title: String,
    pub message: Option<FlashMessage>,
    #[serde(flatten)]
    pub context: T,
}

pub type PageResponse<T> = (CookieJar, Json<Page<T>>);
pub type RedirectResponse = (CookieJar, Redirect);

/// Render a page context, consuming the pending flash message.
pub fn page<T: Serialize>(jar: CookieJar, title: impl Into<String>, context: T) -> PageResponse<T> {
    let (jar, message) = take_flash(jar);
    (
        jar,
        Json(Page {
            title: title.into(),
            message,
            context,
        }),
    )
}

/// Redirect after a successful write, optionally queueing a flash.
pub fn done(jar: CookieJar, flash: Option<FlashMessage>, to: &str) -> RedirectResponse {
    let jar = match flash {
        Some(flash) => push_flash(jar, flash),
        None => jar,
    };
    (jar, Redirect::to(to))
}

/// Turn a recoverable error into an error flash and a redirect to `to`.
/// Other errors are returned for the JSON error response.
pub fn recover(
    jar: CookieJar,
    error: MoviesServiceError,
    to: &str,
) -> Result<RedirectResponse, MoviesServiceError> {
    match error.flash() {
        Some(flash) => Ok((push_flash(jar, flash), Redirect::to(to))),
        None => Err(error),
    }
}

pub fn movie_path(movie_id: i32) -> String {
    format!("/movies/{movie_id}")
}

pub fn petition_path(petition_id: i32) -> String {
    format!("/movies/petitions/{petition_id}")
}

pub const PETITIONS_PATH: &str = "/movies/petitions";
pub const TRENDING_PATH: &str = "/trending";
