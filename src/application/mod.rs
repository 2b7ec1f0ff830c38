//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod export;
pub mod markdown;
pub mod posts;
pub mod repos;
