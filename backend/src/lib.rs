//! # DSO Browser Backend
//!
//! Monthly visibility browser for deep-sky objects and notable stars.
//!
//! The crate reads a pre-built SQLite catalogue (deep-sky objects, stars and a
//! per-constellation visibility table), joins it on constellation for a chosen
//! month, filters by catalogue, star type and free-text search, and buckets the
//! matches into the four fixed evening observation blocks. Results are served as
//! JSON over an Axum REST API with CSV downloads.
//!
//! ## Architecture
//!
//! - [`models`]: Month, time mode, hour slots, catalogue and record types
//! - [`db`]: Schema validation and the repository pattern (SQLite and in-memory)
//! - [`services`]: Filter engine, hour labels, browse orchestration and CSV export
//! - [`api`]: Data Transfer Objects for browse responses
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
