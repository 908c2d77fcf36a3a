//! Repository factory for dependency injection.
//!
//! The server opens exactly one store handle at startup and passes it down;
//! nothing in the crate reaches for a global connection.

use std::path::Path;
use std::sync::Arc;

use super::repo_config::BrowserConfig;
use super::repositories::{LocalRepository, SqliteRepository};
use super::repository::{CatalogueRepository, RepositoryResult};

/// Repository factory for creating repository instances.
///
/// # Example
/// ```no_run
/// use dso_browser::db::{BrowserConfig, RepositoryFactory};
///
/// let config = BrowserConfig::load()?;
/// let repo = RepositoryFactory::from_config(&config)?;
/// assert!(repo.health_check()?);
/// # Ok::<(), dso_browser::db::RepositoryError>(())
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Open the read-only SQLite store at `path`.
    pub fn open_sqlite<P: AsRef<Path>>(path: P) -> RepositoryResult<Arc<dyn CatalogueRepository>> {
        let repo = SqliteRepository::open(path)?;
        Ok(Arc::new(repo))
    }

    /// Open the store named by the configuration.
    pub fn from_config(config: &BrowserConfig) -> RepositoryResult<Arc<dyn CatalogueRepository>> {
        Self::open_sqlite(&config.database.path)
    }

    /// Create an empty in-memory repository.
    pub fn create_local() -> Arc<dyn CatalogueRepository> {
        Arc::new(LocalRepository::new())
    }
}
