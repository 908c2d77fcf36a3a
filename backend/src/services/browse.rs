//! Browse orchestration: one user interaction in, four hour tabs out.

use crate::api::{BrowseResult, DownloadLink, HourTab, MonthInfo, ResultTable};
use crate::db::repository::{CatalogueRepository, RepositoryResult};
use crate::models::{HourSlot, Month, TimeMode};

use super::export::ExportTable;
use super::filter::{apply_filters, FilterCriteria, FilterOptions, FilterOutcome, VisibleRow};
use super::hours::tab_labels;

/// Everything the user selected for one browse request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseRequest {
    pub criteria: FilterCriteria,
    pub mode: TimeMode,
}

fn rows_in_slot<T: Clone>(rows: &[VisibleRow<T>], slot: HourSlot) -> Vec<T> {
    rows.iter()
        .filter(|row| row.shown_in(slot))
        .map(|row| row.record.clone())
        .collect()
}

/// Split a filter outcome into the four hour tabs.
pub fn build_tabs(outcome: &FilterOutcome, mode: TimeMode) -> Vec<HourTab> {
    HourSlot::ALL
        .into_iter()
        .zip(tab_labels(mode))
        .map(|(slot, label)| HourTab {
            slot: slot.number(),
            label: label.to_string(),
            dso: ResultTable::new(rows_in_slot(&outcome.dso, slot)),
            stars: ResultTable::new(rows_in_slot(&outcome.stars, slot)),
        })
        .collect()
}

/// Download links for the non-empty result sets.
pub fn download_links(outcome: &FilterOutcome, month: Month) -> Vec<DownloadLink> {
    let mut links = Vec::new();
    let tables = [
        (ExportTable::Dso, outcome.dso.is_empty()),
        (ExportTable::Stars, outcome.stars.is_empty()),
    ];
    for (table, empty) in tables {
        if !empty {
            links.push(DownloadLink {
                table,
                file_name: table.file_name(month),
                path: table.path().to_string(),
            });
        }
    }
    links
}

/// Run a browse request against the repository.
pub fn browse(
    repo: &dyn CatalogueRepository,
    request: &BrowseRequest,
    options: FilterOptions,
) -> RepositoryResult<BrowseResult> {
    let outcome = apply_filters(repo, &request.criteria, options)?;
    let month = request.criteria.month;

    Ok(BrowseResult {
        month: month.value(),
        month_name: month.name().to_string(),
        mode: request.mode,
        search: request.criteria.search.trim().to_string(),
        tabs: build_tabs(&outcome, request.mode),
        dso_matches: outcome.dso.len(),
        star_matches: outcome.stars.len(),
        downloads: download_links(&outcome, month),
    })
}

/// Months offered by the month selector; all twelve when the store lists none.
pub fn available_months(repo: &dyn CatalogueRepository) -> RepositoryResult<Vec<MonthInfo>> {
    let mut months = repo.available_months()?;
    if months.is_empty() {
        months = Month::all().collect();
    }
    Ok(months
        .into_iter()
        .map(|m| MonthInfo {
            month: m.value(),
            name: m.name().to_string(),
        })
        .collect())
}
