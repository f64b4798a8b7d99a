//! Storage layer
//!
//! SQLite (embedded). The store exclusively owns record identity and
//! timestamp assignment.

pub mod db;

pub use db::{Database, StorageError, UserRecord};
