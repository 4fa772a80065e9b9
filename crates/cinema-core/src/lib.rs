//! Shared infrastructure for Cinema services: configuration, tracing,
//! health probes, request ids, flash messages and query helpers.

pub mod config;
pub mod flash;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
