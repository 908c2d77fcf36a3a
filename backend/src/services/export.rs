//! CSV export of filtered result sets.
//!
//! Columns follow the display order of each table, followed by an `Hour`
//! column carrying the observation block label.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::filter::VisibleRow;
use super::hours::hour_label;
use crate::models::{DsoRecord, Month, StarRecord, TimeMode};

/// A record that renders as one row of a display table.
pub trait TabularRecord {
    /// Column headers in display order.
    const COLUMNS: &'static [&'static str];

    /// Cell values, aligned with [`Self::COLUMNS`].
    fn cells(&self) -> Vec<String>;
}

impl TabularRecord for DsoRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Code",
        "Type",
        "Name",
        "Notes",
        "Constellation",
        "TurnLeftAtOrion",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.object_type.clone(),
            self.name.clone(),
            self.notes.clone(),
            self.constellation.clone(),
            self.turn_left_at_orion.to_string(),
        ]
    }
}

impl TabularRecord for StarRecord {
    const COLUMNS: &'static [&'static str] =
        &["Code", "Type", "Name", "Stars", "Notes", "Constellation"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.star_type.clone(),
            self.name.clone(),
            self.stars.clone(),
            self.notes.clone(),
            self.constellation.clone(),
        ]
    }
}

/// Header of the trailing hour column.
pub const HOUR_COLUMN: &str = "Hour";

/// Which result table to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTable {
    Dso,
    Stars,
}

impl ExportTable {
    /// Download file name, e.g. `dso_visibility_month_3.csv`.
    pub fn file_name(&self, month: Month) -> String {
        let prefix = match self {
            ExportTable::Dso => "dso",
            ExportTable::Stars => "stars",
        };
        format!("{}_visibility_month_{}.csv", prefix, month.value())
    }

    /// Path of the download endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            ExportTable::Dso => "/v1/export/dso.csv",
            ExportTable::Stars => "/v1/export/stars.csv",
        }
    }
}

/// Hour cell: the slot label when the Hour value is a known slot, the raw
/// value otherwise, empty for NULL cells or a store without an Hour column.
pub fn hour_cell<T>(row: &VisibleRow<T>, mode: TimeMode) -> String {
    match (row.slot(), row.hour.value()) {
        (Some(slot), _) => hour_label(slot, mode).to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => String::new(),
    }
}

/// Serialize rows to CSV bytes (UTF-8, header first).
pub fn export_csv<T: TabularRecord>(rows: &[VisibleRow<T>], mode: TimeMode) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = T::COLUMNS.iter().copied().chain(std::iter::once(HOUR_COLUMN));
    writer
        .write_record(header)
        .context("Failed to write CSV header")?;

    for row in rows {
        let mut cells = row.record.cells();
        cells.push(hour_cell(row, mode));
        writer
            .write_record(&cells)
            .context("Failed to write CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))
}
