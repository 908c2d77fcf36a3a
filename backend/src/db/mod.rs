//! Database module for the catalogue store.
//!
//! This module provides read-only access to the catalogue via the Repository
//! pattern, so the filter engine does not care where rows come from.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - filter, browse, export     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌──────────▼──────────────┐
//! │ SQLite Repository│     │  Local Repository       │
//! │ (read-only file) │     │  (in-memory)            │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! The module includes:
//! - `schema`: one-time schema check and canonical column mapping
//! - `repository`: trait definition and error types
//! - `repositories::sqlite`: SQLite implementation
//! - `repositories::local`: In-memory implementation for tests
//! - `factory`: opens the process-scoped handle
//! - `repo_config`: TOML and environment configuration

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod schema;

pub use factory::RepositoryFactory;
pub use repo_config::BrowserConfig;
pub use repositories::{LocalRepository, SqliteRepository};
pub use repository::{CatalogueRepository, ErrorContext, RepositoryError, RepositoryResult};
pub use schema::SchemaMap;
