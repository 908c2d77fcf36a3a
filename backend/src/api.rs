//! Data Transfer Objects returned by the browse service.
//!
//! These types are shared by the service layer and the HTTP layer and
//! serialize directly to the JSON the front end renders.

use serde::{Deserialize, Serialize};

use crate::models::{DsoRecord, StarRecord, TimeMode};
use crate::services::export::{ExportTable, TabularRecord};

/// Display width bucket for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidth {
    Small,
    Medium,
    Large,
}

impl ColumnWidth {
    /// Bucket for the longest value in a column (header included).
    pub fn for_length(n_chars: usize) -> Self {
        if n_chars <= 13 {
            ColumnWidth::Small
        } else if n_chars <= 50 {
            ColumnWidth::Medium
        } else {
            ColumnWidth::Large
        }
    }
}

/// Column header with its width bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub width: ColumnWidth,
}

/// One display table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable<T> {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<T>,
}

impl<T: TabularRecord> ResultTable<T> {
    /// Build a table, sizing each column from its header and cells.
    pub fn new(rows: Vec<T>) -> Self {
        let mut longest: Vec<usize> = T::COLUMNS.iter().map(|c| c.chars().count()).collect();
        for row in &rows {
            for (idx, cell) in row.cells().iter().enumerate() {
                if let Some(max) = longest.get_mut(idx) {
                    *max = (*max).max(cell.chars().count());
                }
            }
        }

        let columns = T::COLUMNS
            .iter()
            .zip(longest)
            .map(|(name, len)| ColumnSpec {
                name: name.to_string(),
                width: ColumnWidth::for_length(len),
            })
            .collect();

        Self { columns, rows }
    }
}

/// One of the four hour tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourTab {
    /// Slot number (1..=4)
    pub slot: u8,
    /// Tab label, e.g. "21:00 SDT"
    pub label: String,
    pub dso: ResultTable<DsoRecord>,
    pub stars: ResultTable<StarRecord>,
}

/// CSV download offered for a non-empty result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub table: ExportTable,
    pub file_name: String,
    /// Endpoint path; accepts the same query parameters as the browse request.
    pub path: String,
}

/// Full response for one browse request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseResult {
    pub month: u8,
    pub month_name: String,
    pub mode: TimeMode,
    pub search: String,
    pub tabs: Vec<HourTab>,
    /// Total DSO matches across all hours
    pub dso_matches: usize,
    /// Total star matches across all hours
    pub star_matches: usize,
    pub downloads: Vec<DownloadLink>,
}

/// Month entry for the month selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthInfo {
    pub month: u8,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(name: &str, notes: &str) -> StarRecord {
        StarRecord {
            code: "Alp CVn".to_string(),
            star_type: "Double Star".to_string(),
            name: name.to_string(),
            stars: "2".to_string(),
            notes: notes.to_string(),
            constellation: "Canes Venatici".to_string(),
        }
    }

    #[test]
    fn test_width_buckets() {
        assert_eq!(ColumnWidth::for_length(0), ColumnWidth::Small);
        assert_eq!(ColumnWidth::for_length(13), ColumnWidth::Small);
        assert_eq!(ColumnWidth::for_length(14), ColumnWidth::Medium);
        assert_eq!(ColumnWidth::for_length(50), ColumnWidth::Medium);
        assert_eq!(ColumnWidth::for_length(51), ColumnWidth::Large);
    }

    #[test]
    fn test_empty_table_sized_by_headers() {
        let table = ResultTable::<StarRecord>::new(vec![]);
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Code", "Type", "Name", "Stars", "Notes", "Constellation"]
        );
        assert!(table
            .columns
            .iter()
            .all(|c| c.width == ColumnWidth::Small));
    }

    #[test]
    fn test_widths_follow_longest_cell() {
        let long_note = "Striking gold and lilac pair, easy in any telescope at low power";
        let table = ResultTable::new(vec![star("Cor Caroli", long_note)]);
        let width_of = |name: &str| {
            table
                .columns
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.width)
                .unwrap()
        };
        assert_eq!(width_of("Name"), ColumnWidth::Small);
        assert_eq!(width_of("Constellation"), ColumnWidth::Medium);
        assert_eq!(width_of("Notes"), ColumnWidth::Large);
    }
}
