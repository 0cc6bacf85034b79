#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Grid store persistence for climate hazard indicator values.
//!
//! Backed by `SQLite` via `switchy_database`. The one write primitive is
//! delete-then-insert per grid-cell key, so readers never observe a
//! partially overwritten indicator set at a cell.

pub mod db;
pub mod queries;

/// Errors that can occur during grid store operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed (e.g., creating the database file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<switchy_database::DatabaseError> for DbError {
    fn from(e: switchy_database::DatabaseError) -> Self {
        Self::Database(e.to_string())
    }
}
