//! Application state for the HTTP server.

use std::sync::Arc;

use super::error::AppError;
use crate::db::repository::{CatalogueRepository, RepositoryError};
use crate::services::FilterOptions;

/// The catalogue handle, or the reason the session cannot show data.
#[derive(Clone)]
pub enum CatalogueHandle {
    Ready(Arc<dyn CatalogueRepository>),
    Unavailable(Arc<RepositoryError>),
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store opened once at startup
    pub catalogue: CatalogueHandle,
    /// Filter engine behavior from configuration
    pub filter_options: FilterOptions,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn CatalogueRepository>, filter_options: FilterOptions) -> Self {
        Self {
            catalogue: CatalogueHandle::Ready(repository),
            filter_options,
        }
    }

    /// State for a session whose store failed to open or validate.
    ///
    /// The server keeps running and answers data requests with the error's
    /// informational message.
    pub fn unavailable(error: RepositoryError, filter_options: FilterOptions) -> Self {
        Self {
            catalogue: CatalogueHandle::Unavailable(Arc::new(error)),
            filter_options,
        }
    }

    /// Repository for a data request, or the session error.
    pub fn repository(&self) -> Result<&dyn CatalogueRepository, AppError> {
        match &self.catalogue {
            CatalogueHandle::Ready(repo) => Ok(repo.as_ref()),
            CatalogueHandle::Unavailable(err) => Err(AppError::unavailable(err)),
        }
    }
}
