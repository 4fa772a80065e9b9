//! Geographic regions used to bucket purchase statistics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the five fixed regions a user profile can belong to.
///
/// Wire and storage format: lowercase code (`"northeast"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Northeast,
    Southeast,
    Midwest,
    Southwest,
    West,
}

/// Presentational metadata for a region on the trending map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionInfo {
    pub name: &'static str,
    pub center_lat: f64,
    pub center_lng: f64,
    pub color: &'static str,
}

impl Region {
    /// All regions in display order.
    pub const ALL: [Region; 5] = [
        Region::Northeast,
        Region::Southeast,
        Region::Midwest,
        Region::Southwest,
        Region::West,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Northeast => "northeast",
            Self::Southeast => "southeast",
            Self::Midwest => "midwest",
            Self::Southwest => "southwest",
            Self::West => "west",
        }
    }

    pub fn info(self) -> RegionInfo {
        match self {
            Self::Northeast => RegionInfo {
                name: "Northeast",
                center_lat: 42.0,
                center_lng: -73.0,
                color: "#FF6B6B",
            },
            Self::Southeast => RegionInfo {
                name: "Southeast",
                center_lat: 33.0,
                center_lng: -84.0,
                color: "#4ECDC4",
            },
            Self::Midwest => RegionInfo {
                name: "Midwest",
                center_lat: 41.0,
                center_lng: -93.0,
                color: "#45B7D1",
            },
            Self::Southwest => RegionInfo {
                name: "Southwest",
                center_lat: 34.0,
                center_lng: -111.0,
                color: "#FFA07A",
            },
            Self::West => RegionInfo {
                name: "West",
                center_lat: 40.0,
                center_lng: -120.0,
                color: "#98D8C8",
            },
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string is not one of the five region codes.
#[derive(Debug, Error)]
#[error("unknown region: {0:?}")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.code() == s)
            .ok_or_else(|| UnknownRegion(s.to_owned()))
    }
}
