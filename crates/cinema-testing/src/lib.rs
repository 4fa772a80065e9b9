//! Test utilities for Cinema services.
//!
//! Provides gateway identity headers and flash-cookie helpers.
//! Import in tests only, never in production code.

pub mod auth;
pub mod flash;
