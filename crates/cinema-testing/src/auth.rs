//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-cinema-user-id` + `x-cinema-user-role`
//! headers injected by the gateway. In tests, `MockAuth` produces these headers
//! directly so no real gateway or session is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use cinema_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use cinema_domain::user::UserRole;
use uuid::Uuid;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn normal(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Normal)
    }

    pub fn staff(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Staff)
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from(u16::from(self.user_role.as_u8())),
        );
        map
    }
}
