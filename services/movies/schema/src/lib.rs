//! SeaORM entities for the movies service.
//!
//! `orders` and `order_items` belong to the purchase subsystem and are only
//! read here.

pub mod movies;
pub mod order_items;
pub mod orders;
pub mod petitions;
pub mod ratings;
pub mod replies;
pub mod reviews;
pub mod user_profiles;
pub mod users;
pub mod votes;
