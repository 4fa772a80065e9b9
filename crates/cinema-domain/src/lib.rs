//! Domain types shared across all Cinema crates.
//!
//! Pure types and validation rules with no framework dependencies.

pub mod form;
pub mod rating;
pub mod region;
pub mod user;
pub mod vote;
