//! User domain types.

use serde::{Deserialize, Serialize};

/// User permission level.
///
/// Wire format: `u8` (0 = Normal, 1 = Staff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Normal = 0,
    Staff = 1,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Normal),
            1 => Some(Self::Staff),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_staff(self) -> bool {
        matches!(self, Self::Staff)
    }
}
