//! Gateway-injected identity headers extractor.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::response::Redirect;
use cinema_domain::user::UserRole;
use http::request::Parts;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-cinema-user-id";
pub const USER_ROLE_HEADER: &str = "x-cinema-user-role";

/// Where unauthenticated callers of protected pages are sent.
pub const LOGIN_PATH: &str = "/accounts/login";

/// User identity injected by the gateway via `x-cinema-user-id` and
/// `x-cinema-user-role` headers.
///
/// When either header is absent or malformed the request is redirected to
/// the login page with `next` set to the requested path. Use
/// `Option<IdentityHeaders>` on pages that anonymous visitors may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl IdentityHeaders {
    fn from_parts(parts: &Parts) -> Option<Self> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())?;

        let user_role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u8>().ok())
            .and_then(UserRole::from_u8)?;

        Some(Self { user_id, user_role })
    }
}

/// `/accounts/login?next=<path>`
pub fn login_redirect(path: &str) -> Redirect {
    Redirect::to(&format!("{LOGIN_PATH}?next={path}"))
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    // axum-core 0.5 declares `fn -> impl Future + Send`; read the headers
    // synchronously and return a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);
        let path = parts.uri.path().to_owned();

        async move { identity.ok_or_else(|| login_redirect(&path)) }
    }
}

impl<S> OptionalFromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);

        async move { Ok(identity) }
    }
}
