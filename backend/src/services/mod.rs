//! Service layer for business logic and orchestration.
//!
//! Services sit between the repository and the HTTP layer: they filter the
//! catalogue, bucket rows into observation blocks and produce CSV exports.

pub mod browse;
pub mod export;
pub mod filter;
pub mod hours;

pub use browse::{available_months, browse, BrowseRequest};
pub use export::{export_csv, hour_cell, ExportTable, TabularRecord};
pub use filter::{
    apply_filters, filter_records, EmptySelection, FilterCriteria, FilterOptions, FilterOutcome,
    VisibleRow,
};
pub use hours::{hour_label, tab_labels};
