//! HTTP handlers

pub mod health;
pub mod submit;
pub mod users;

pub use health::health;
