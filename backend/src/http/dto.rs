//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies for browse results are the service-layer types from
//! [`crate::api`]; this module holds the request-side types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

pub use crate::api::{BrowseResult, DownloadLink, HourTab, MonthInfo, ResultTable};

use super::error::AppError;
use crate::models::{Catalogue, Month, StarKind, TimeMode};
use crate::services::{BrowseRequest, FilterCriteria};

/// Query parameters shared by the browse and export endpoints.
///
/// Every field is taken as text so malformed values are reported through
/// [`AppError`] rather than the extractor's plain-text rejection.
/// `catalogues` and `star_types` are comma-separated. Omitting one selects
/// every option; passing it empty selects none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub catalogues: Option<String>,
    #[serde(default)]
    pub star_types: Option<String>,
}

fn parse_list<T>(raw: &str) -> Result<BTreeSet<T>, AppError>
where
    T: FromStr<Err = String> + Ord,
{
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<T>().map_err(AppError::BadRequest))
        .collect()
}

impl BrowseQuery {
    /// Validate the query into a browse request.
    pub fn into_request(self) -> Result<BrowseRequest, AppError> {
        let month = match self.month.as_deref().map(str::trim) {
            None | Some("") => Month::default(),
            Some(raw) => raw
                .parse::<u8>()
                .ok()
                .and_then(Month::new)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Month must be between 1 and 12, got {}", raw))
                })?,
        };

        let mode = match self.mode.as_deref() {
            None => TimeMode::default(),
            Some(raw) => raw.parse::<TimeMode>().map_err(AppError::BadRequest)?,
        };

        let mut criteria = FilterCriteria::new(month).with_search(self.q.unwrap_or_default());
        if let Some(raw) = self.catalogues.as_deref() {
            criteria = criteria.with_catalogues(parse_list::<Catalogue>(raw)?);
        }
        if let Some(raw) = self.star_types.as_deref() {
            criteria = criteria.with_star_kinds(parse_list::<StarKind>(raw)?);
        }

        Ok(BrowseRequest { criteria, mode })
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "ready", or the informational message for an unavailable store
    pub catalogue: String,
}

/// Month selector response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthListResponse {
    pub months: Vec<MonthInfo>,
    pub total: usize,
}
