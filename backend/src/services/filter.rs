//! Visibility filter engine.
//!
//! Turns the raw catalogue tables into the DSO and star result sets for one
//! month: rows are kept when their constellation is optimal that month, their
//! catalogue (or star type) is selected, and the search text occurs in their
//! name, type or constellation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::db::repository::{CatalogueRepository, RepositoryResult};
use crate::models::{
    constellation_key, Catalogue, DsoRecord, HourSlot, Month, OptimalSlot, StarKind, StarRecord,
    VisibilityHour,
};

/// What an empty catalogue or star-type selection means.
///
/// `None` keeps the long-standing behavior: nothing selected, nothing shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySelection {
    #[default]
    None,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub empty_selection: EmptySelection,
}

/// User-selected filters for one browse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub month: Month,
    /// Free text matched against name, type and constellation.
    pub search: String,
    pub catalogues: BTreeSet<Catalogue>,
    pub star_kinds: BTreeSet<StarKind>,
}

impl FilterCriteria {
    /// Criteria for `month` with every catalogue and star type selected.
    pub fn new(month: Month) -> Self {
        Self {
            month,
            search: String::new(),
            catalogues: Catalogue::ALL.into_iter().collect(),
            star_kinds: StarKind::ALL.into_iter().collect(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_catalogues<I: IntoIterator<Item = Catalogue>>(mut self, catalogues: I) -> Self {
        self.catalogues = catalogues.into_iter().collect();
        self
    }

    pub fn with_star_kinds<I: IntoIterator<Item = StarKind>>(mut self, kinds: I) -> Self {
        self.star_kinds = kinds.into_iter().collect();
        self
    }

    /// Trimmed, lower-cased search needle.
    fn needle(&self) -> String {
        self.search.trim().to_lowercase()
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::new(Month::default())
    }
}

/// Fields shared by DSO and star rows that the engine filters on.
pub trait Observable {
    fn constellation(&self) -> &str;
    /// Name, type and constellation, in that order.
    fn search_fields(&self) -> [&str; 3];
}

impl Observable for DsoRecord {
    fn constellation(&self) -> &str {
        &self.constellation
    }

    fn search_fields(&self) -> [&str; 3] {
        [&self.name, &self.object_type, &self.constellation]
    }
}

impl Observable for StarRecord {
    fn constellation(&self) -> &str {
        &self.constellation
    }

    fn search_fields(&self) -> [&str; 3] {
        [&self.name, &self.star_type, &self.constellation]
    }
}

/// A matched row together with the Hour value of the visibility row it joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow<T> {
    #[serde(flatten)]
    pub record: T,
    pub hour: VisibilityHour,
}

impl<T> VisibleRow<T> {
    pub fn slot(&self) -> Option<HourSlot> {
        self.hour.value().and_then(HourSlot::from_number)
    }

    /// Whether the row is listed under the tab for `slot`.
    ///
    /// Unbucketed rows are listed under every tab; NULL or out-of-range
    /// hours under none, though they still count in totals and exports.
    pub fn shown_in(&self, slot: HourSlot) -> bool {
        match self.hour {
            VisibilityHour::Unbucketed => true,
            VisibilityHour::Recorded(value) => value == Some(i64::from(slot.number())),
        }
    }
}

/// The two result sets of one browse request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub dso: Vec<VisibleRow<DsoRecord>>,
    pub stars: Vec<VisibleRow<StarRecord>>,
}

/// Case-insensitive substring match; an empty needle matches everything.
///
/// `needle` must already be trimmed and lower-cased.
pub fn matches_search(needle: &str, fields: &[&str]) -> bool {
    needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(needle))
}

/// Resolve the active selection, `None` meaning "show nothing".
fn active_selection<T: Ord + Copy>(
    selected: &BTreeSet<T>,
    all: &[T],
    options: FilterOptions,
) -> Option<BTreeSet<T>> {
    if !selected.is_empty() {
        return Some(selected.clone());
    }
    match options.empty_selection {
        EmptySelection::None => None,
        EmptySelection::All => Some(all.iter().copied().collect()),
    }
}

/// Hour values per constellation join key.
fn hours_by_constellation(slots: &[OptimalSlot]) -> HashMap<String, BTreeSet<VisibilityHour>> {
    let mut map: HashMap<String, BTreeSet<VisibilityHour>> = HashMap::new();
    for slot in slots {
        map.entry(constellation_key(&slot.constellation))
            .or_default()
            .insert(slot.hour);
    }
    map
}

fn join_visible<T, F>(
    records: Vec<T>,
    hours: &HashMap<String, BTreeSet<VisibilityHour>>,
    needle: &str,
    keep: F,
) -> Vec<VisibleRow<T>>
where
    T: Observable + Clone,
    F: Fn(&T) -> bool,
{
    let mut rows = Vec::new();
    for record in records {
        let Some(record_hours) = hours.get(&constellation_key(record.constellation())) else {
            continue;
        };
        if !keep(&record) || !matches_search(needle, &record.search_fields()) {
            continue;
        }
        for hour in record_hours {
            rows.push(VisibleRow {
                record: record.clone(),
                hour: *hour,
            });
        }
    }
    // Stable: rows sharing hour and constellation keep storage order.
    rows.sort_by(|a, b| {
        a.hour
            .cmp(&b.hour)
            .then_with(|| a.record.constellation().cmp(b.record.constellation()))
    });
    rows
}

/// Filter already-loaded tables. Pure; used by [`apply_filters`].
pub fn filter_records(
    slots: &[OptimalSlot],
    dso: Vec<DsoRecord>,
    stars: Vec<StarRecord>,
    criteria: &FilterCriteria,
    options: FilterOptions,
) -> FilterOutcome {
    let hours = hours_by_constellation(slots);
    let needle = criteria.needle();

    let dso = match active_selection(&criteria.catalogues, &Catalogue::ALL, options) {
        Some(catalogues) => join_visible(dso, &hours, &needle, |d: &DsoRecord| {
            catalogues.contains(&d.catalogue())
        }),
        None => Vec::new(),
    };

    let stars = match active_selection(&criteria.star_kinds, &StarKind::ALL, options) {
        Some(kinds) => join_visible(stars, &hours, &needle, |s: &StarRecord| {
            kinds.contains(&s.kind())
        }),
        None => Vec::new(),
    };

    FilterOutcome { dso, stars }
}

/// Run the filter engine against a repository.
pub fn apply_filters(
    repo: &dyn CatalogueRepository,
    criteria: &FilterCriteria,
    options: FilterOptions,
) -> RepositoryResult<FilterOutcome> {
    let slots = repo.optimal_slots(criteria.month)?;
    let outcome = filter_records(
        &slots,
        repo.dso_records()?,
        repo.star_records()?,
        criteria,
        options,
    );
    log::debug!(
        "month={} search={:?}: {} DSO rows, {} star rows",
        criteria.month.value(),
        criteria.search,
        outcome.dso.len(),
        outcome.stars.len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dso(code: &str, name: &str, kind: &str, constellation: &str) -> DsoRecord {
        DsoRecord {
            code: code.to_string(),
            object_type: kind.to_string(),
            name: name.to_string(),
            notes: String::new(),
            constellation: constellation.to_string(),
            catalogue_label: None,
            turn_left_at_orion: false,
        }
    }

    fn star(code: &str, name: &str, kind: &str, constellation: &str) -> StarRecord {
        StarRecord {
            code: code.to_string(),
            star_type: kind.to_string(),
            name: name.to_string(),
            stars: "1".to_string(),
            notes: String::new(),
            constellation: constellation.to_string(),
        }
    }

    fn slot(constellation: &str, hour: VisibilityHour) -> OptimalSlot {
        OptimalSlot {
            constellation: constellation.to_string(),
            hour,
        }
    }

    fn sample_dso() -> Vec<DsoRecord> {
        vec![
            dso("M42", "Orion Nebula", "Nebula", "Orion"),
            dso("C14", "Double Cluster", "Open Cluster", "Perseus"),
            dso("NGC2024", "Flame Nebula", "Nebula", "orion "),
            dso("M57", "Ring Nebula", "Planetary Nebula", "Lyra"),
        ]
    }

    #[test]
    fn test_only_optimal_constellations() {
        let slots = vec![
            slot("Orion", VisibilityHour::at(1)),
            slot("Perseus", VisibilityHour::at(2)),
        ];
        let outcome = filter_records(
            &slots,
            sample_dso(),
            vec![],
            &FilterCriteria::new(Month::JANUARY),
            FilterOptions::default(),
        );
        let codes: Vec<&str> = outcome.dso.iter().map(|r| r.record.code.as_str()).collect();
        assert_eq!(codes, vec!["M42", "NGC2024", "C14"]);
    }

    #[test]
    fn test_catalogue_filter() {
        let slots = vec![
            slot("Orion", VisibilityHour::at(1)),
            slot("Perseus", VisibilityHour::at(1)),
        ];
        let criteria =
            FilterCriteria::new(Month::JANUARY).with_catalogues([Catalogue::Caldwell]);
        let outcome = filter_records(
            &slots,
            sample_dso(),
            vec![],
            &criteria,
            FilterOptions::default(),
        );
        assert_eq!(outcome.dso.len(), 1);
        assert_eq!(outcome.dso[0].record.code, "C14");
    }

    #[test]
    fn test_empty_catalogue_selection_yields_nothing() {
        let slots = vec![slot("Orion", VisibilityHour::at(1))];
        let criteria = FilterCriteria::new(Month::JANUARY).with_catalogues([]);
        let outcome = filter_records(
            &slots,
            sample_dso(),
            vec![star("Alp Ori", "Betelgeuse", "Red Giant", "Orion")],
            &criteria,
            FilterOptions::default(),
        );
        assert!(outcome.dso.is_empty());
        assert_eq!(outcome.stars.len(), 1);
    }

    #[test]
    fn test_empty_selection_all_option() {
        let slots = vec![slot("Orion", VisibilityHour::at(1))];
        let criteria = FilterCriteria::new(Month::JANUARY)
            .with_catalogues([])
            .with_star_kinds([]);
        let options = FilterOptions {
            empty_selection: EmptySelection::All,
        };
        let outcome = filter_records(
            &slots,
            sample_dso(),
            vec![star("Alp Ori", "Betelgeuse", "Red Giant", "Orion")],
            &criteria,
            options,
        );
        assert_eq!(outcome.dso.len(), 2);
        assert_eq!(outcome.stars.len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let slots = vec![
            slot("Orion", VisibilityHour::Unbucketed),
            slot("Lyra", VisibilityHour::Unbucketed),
        ];
        let by_name = FilterCriteria::new(Month::JANUARY).with_search("FLAME");
        let by_type = FilterCriteria::new(Month::JANUARY).with_search("planetary");
        let by_constellation = FilterCriteria::new(Month::JANUARY).with_search("  lyr ");

        let run = |c: &FilterCriteria| {
            filter_records(&slots, sample_dso(), vec![], c, FilterOptions::default())
                .dso
                .into_iter()
                .map(|r| r.record.code)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(&by_name), vec!["NGC2024"]);
        assert_eq!(run(&by_type), vec!["M57"]);
        assert_eq!(run(&by_constellation), vec!["M57"]);
    }

    #[test]
    fn test_star_type_partition() {
        let slots = vec![slot("Orion", VisibilityHour::at(1))];
        let stars = vec![
            star("Alp Ori", "Betelgeuse", "Red Giant", "Orion"),
            star("Bet Ori", "Rigel", "Double Star", "Orion"),
            star("Gam Ori", "Bellatrix", "", "Orion"),
        ];
        let criteria = FilterCriteria::new(Month::JANUARY).with_star_kinds([StarKind::Other]);
        let outcome = filter_records(&slots, vec![], stars, &criteria, FilterOptions::default());
        assert_eq!(outcome.stars.len(), 1);
        assert_eq!(outcome.stars[0].record.name, "Bellatrix");
    }

    #[test]
    fn test_rows_repeat_per_hour_and_sort_by_hour() {
        let slots = vec![
            slot("Orion", VisibilityHour::at(3)),
            slot("Orion", VisibilityHour::at(1)),
            slot("Orion", VisibilityHour::at(1)),
        ];
        let outcome = filter_records(
            &slots,
            vec![dso("M42", "Orion Nebula", "Nebula", "Orion")],
            vec![],
            &FilterCriteria::new(Month::JANUARY),
            FilterOptions::default(),
        );
        let hours: Vec<Option<i64>> = outcome.dso.iter().map(|r| r.hour.value()).collect();
        assert_eq!(hours, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_shown_in_slot() {
        let fixed = VisibleRow {
            record: (),
            hour: VisibilityHour::at(2),
        };
        assert!(fixed.shown_in(HourSlot::Second));
        assert!(!fixed.shown_in(HourSlot::First));

        let unbucketed = VisibleRow {
            record: (),
            hour: VisibilityHour::Unbucketed,
        };
        assert!(HourSlot::ALL.iter().all(|s| unbucketed.shown_in(*s)));

        let null_hour = VisibleRow {
            record: (),
            hour: VisibilityHour::Recorded(None),
        };
        assert!(HourSlot::ALL.iter().all(|s| !null_hour.shown_in(*s)));
        assert_eq!(null_hour.slot(), None);

        let out_of_range = VisibleRow {
            record: (),
            hour: VisibilityHour::at(7),
        };
        assert!(HourSlot::ALL.iter().all(|s| !out_of_range.shown_in(*s)));
        assert_eq!(out_of_range.slot(), None);
    }

    #[test]
    fn test_apply_filters_with_local_repository() {
        use crate::db::repositories::LocalRepository;

        let repo = LocalRepository::new();
        repo.add_visibility("Orion", 1, VisibilityHour::at(1), true);
        repo.add_visibility("Lyra", 1, VisibilityHour::at(1), false);
        for record in sample_dso() {
            repo.add_dso(record);
        }

        let outcome = apply_filters(
            &repo,
            &FilterCriteria::new(Month::JANUARY),
            FilterOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.dso.len(), 2);
        assert!(outcome
            .dso
            .iter()
            .all(|r| constellation_key(&r.record.constellation) == "orion"));
    }
}
