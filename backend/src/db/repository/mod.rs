//! Repository trait for the read-only catalogue store.
//!
//! The browser never writes. Implementations expose the three source tables
//! (Visibility, DSO, Stars) in their canonical shape so the filter engine can
//! work against any backend: the SQLite file in production and the in-memory
//! [`LocalRepository`](crate::db::repositories::LocalRepository) in tests.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{DsoRecord, Month, OptimalSlot, StarRecord};

/// Read access to the catalogue store.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single handle can be shared by
/// the HTTP state for the lifetime of the process.
pub trait CatalogueRepository: Send + Sync {
    /// Check if the store answers queries.
    fn health_check(&self) -> RepositoryResult<bool>;

    /// Distinct months (1..=12) present in the Visibility table, ascending.
    fn available_months(&self) -> RepositoryResult<Vec<Month>>;

    /// Visibility rows with `Optimal = 1` for the given month.
    fn optimal_slots(&self, month: Month) -> RepositoryResult<Vec<OptimalSlot>>;

    /// All DSO rows in storage order.
    fn dso_records(&self) -> RepositoryResult<Vec<DsoRecord>>;

    /// All star rows in storage order.
    fn star_records(&self) -> RepositoryResult<Vec<StarRecord>>;
}
