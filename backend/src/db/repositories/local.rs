//! In-memory local repository implementation.
//!
//! Holds the three catalogue tables in plain vectors. Used by unit and
//! integration tests, and anywhere a store is needed without a SQLite file.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::repository::{CatalogueRepository, RepositoryError, RepositoryResult};
use crate::models::{DsoRecord, Month, OptimalSlot, StarRecord, VisibilityHour, VisibilityRow};

/// In-memory local repository.
///
/// # Example
/// ```
/// use dso_browser::db::repositories::LocalRepository;
/// use dso_browser::db::repository::CatalogueRepository;
/// use dso_browser::models::{Month, VisibilityHour};
///
/// let repo = LocalRepository::new();
/// repo.add_visibility("Orion", 1, VisibilityHour::at(1), true);
/// assert_eq!(repo.optimal_slots(Month::JANUARY).unwrap().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    visibility: Vec<VisibilityRow>,
    dso: Vec<DsoRecord>,
    stars: Vec<StarRecord>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            visibility: Vec::new(),
            dso: Vec::new(),
            stars: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Visibility row; [`VisibilityHour::Unbucketed`] stands for a
    /// store without an Hour column.
    pub fn add_visibility(
        &self,
        constellation: &str,
        month: i64,
        hour: VisibilityHour,
        optimal: bool,
    ) {
        self.data.write().visibility.push(VisibilityRow {
            constellation: constellation.to_string(),
            month,
            hour,
            optimal,
        });
    }

    pub fn add_dso(&self, record: DsoRecord) {
        self.data.write().dso.push(record);
    }

    pub fn add_star(&self, record: StarRecord) {
        self.data.write().stars.push(record);
    }

    /// Simulate a store that stops answering.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection("Local repository marked unhealthy")
                .with_operation(operation))
        }
    }
}

impl CatalogueRepository for LocalRepository {
    fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    fn available_months(&self) -> RepositoryResult<Vec<Month>> {
        self.ensure_healthy("available_months")?;
        let months: BTreeSet<Month> = self
            .data
            .read()
            .visibility
            .iter()
            .filter_map(|row| u8::try_from(row.month).ok().and_then(Month::new))
            .collect();
        Ok(months.into_iter().collect())
    }

    fn optimal_slots(&self, month: Month) -> RepositoryResult<Vec<OptimalSlot>> {
        self.ensure_healthy("optimal_slots")?;
        Ok(self
            .data
            .read()
            .visibility
            .iter()
            .filter(|row| row.optimal && row.month == i64::from(month.value()))
            .map(|row| OptimalSlot {
                constellation: row.constellation.clone(),
                hour: row.hour,
            })
            .collect())
    }

    fn dso_records(&self) -> RepositoryResult<Vec<DsoRecord>> {
        self.ensure_healthy("dso_records")?;
        Ok(self.data.read().dso.clone())
    }

    fn star_records(&self) -> RepositoryResult<Vec<StarRecord>> {
        self.ensure_healthy("star_records")?;
        Ok(self.data.read().stars.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_months_sorted_and_deduplicated() {
        let repo = LocalRepository::new();
        repo.add_visibility("Lyra", 7, VisibilityHour::Unbucketed, true);
        repo.add_visibility("Orion", 1, VisibilityHour::Unbucketed, true);
        repo.add_visibility("Orion", 1, VisibilityHour::Unbucketed, false);
        repo.add_visibility("Nowhere", 14, VisibilityHour::Unbucketed, true);

        let months: Vec<u8> = repo
            .available_months()
            .unwrap()
            .iter()
            .map(|m| m.value())
            .collect();
        assert_eq!(months, vec![1, 7]);
    }

    #[test]
    fn test_optimal_slots_keep_hour_cells() {
        let repo = LocalRepository::new();
        repo.add_visibility("Orion", 1, VisibilityHour::at(1), true);
        repo.add_visibility("Taurus", 1, VisibilityHour::Recorded(None), true);
        repo.add_visibility("Lyra", 1, VisibilityHour::at(1), false);
        repo.add_visibility("Lyra", 7, VisibilityHour::at(2), true);

        let slots = repo.optimal_slots(Month::JANUARY).unwrap();
        assert_eq!(
            slots,
            vec![
                OptimalSlot {
                    constellation: "Orion".to_string(),
                    hour: VisibilityHour::Recorded(Some(1)),
                },
                OptimalSlot {
                    constellation: "Taurus".to_string(),
                    hour: VisibilityHour::Recorded(None),
                },
            ]
        );
    }

    #[test]
    fn test_unhealthy_repository_fails_queries() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().unwrap());
        assert!(repo.dso_records().is_err());
        assert!(repo.optimal_slots(Month::JANUARY).is_err());
    }
}
