//! Star ratings.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

/// Error returned when a value is not a whole number of stars in 1..=5.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("stars must be an integer between 1 and 5")]
pub struct InvalidStars;

impl Stars {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, InvalidStars> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidStars)
        }
    }

    /// Parse a raw form value. Only plain ASCII digits are accepted, so
    /// `"+3"`, `" 3"` and `"3.0"` are all rejected.
    pub fn parse(raw: &str) -> Result<Self, InvalidStars> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStars);
        }
        let value: u8 = raw.parse().map_err(|_| InvalidStars)?;
        Self::new(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = InvalidStars;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Aggregate rating information for a movie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: u64,
    /// Mean stars rounded to one decimal place, `0.0` when unrated.
    pub average: f64,
}

impl RatingSummary {
    pub fn from_totals(sum: u64, count: u64) -> Self {
        if count == 0 {
            return Self {
                count: 0,
                average: 0.0,
            };
        }
        let mean = sum as f64 / count as f64;
        Self {
            count,
            average: (mean * 10.0).round() / 10.0,
        }
    }
}
