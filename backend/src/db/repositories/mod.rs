//! Repository implementations module.
//!
//! This module contains the implementations of the `CatalogueRepository` trait:
//! - `sqlite`: read-only SQLite store (production)
//! - `local`: In-memory implementation for unit testing and local development
pub mod local;
pub mod sqlite;

pub use local::LocalRepository;
pub use sqlite::SqliteRepository;
