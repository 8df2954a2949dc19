//! Database module
//!
//! Handles SQLite connection, migrations and the `Storage` implementation.

pub mod connection;
pub mod migrations;
mod store;

pub use connection::{Database, DbError, DbResult};
