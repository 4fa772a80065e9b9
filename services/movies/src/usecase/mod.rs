pub mod account;
pub mod movie;
pub mod petition;
pub mod rating;
pub mod reply;
pub mod review;
pub mod trending;
pub mod vote;
