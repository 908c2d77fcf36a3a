//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Store access is synchronous rusqlite, so it runs on the blocking pool.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{BrowseQuery, BrowseResult, HealthResponse, MonthListResponse};
use super::error::AppError;
use super::state::{AppState, CatalogueHandle};
use crate::services::{self, export_csv, ExportTable, FilterOutcome};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Run synchronous store work off the async executor.
async fn run_blocking<T, F>(state: AppState, work: F) -> Result<T, AppError>
where
    F: FnOnce(&AppState) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running and report whether the catalogue is usable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let catalogue = run_blocking(state, |state| {
        Ok(match &state.catalogue {
            CatalogueHandle::Ready(repo) => match repo.health_check() {
                Ok(true) => "ready".to_string(),
                Ok(false) => "disconnected".to_string(),
                Err(e) => format!("error: {}", e),
            },
            CatalogueHandle::Unavailable(err) => err.session_message(),
        })
    })
    .await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        catalogue,
    }))
}

// =============================================================================
// Browse
// =============================================================================

/// GET /v1/months
///
/// Months offered by the month selector.
pub async fn list_months(State(state): State<AppState>) -> HandlerResult<MonthListResponse> {
    let months = run_blocking(state, |state| {
        Ok(services::available_months(state.repository()?)?)
    })
    .await?;
    let total = months.len();
    Ok(Json(MonthListResponse { months, total }))
}

/// GET /v1/browse
///
/// The DSO and star tables for each of the four hour tabs.
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> HandlerResult<BrowseResult> {
    let request = query.into_request()?;
    let result = run_blocking(state, move |state| {
        Ok(services::browse(
            state.repository()?,
            &request,
            state.filter_options,
        )?)
    })
    .await?;
    Ok(Json(result))
}

// =============================================================================
// CSV Export
// =============================================================================

fn csv_response(table: ExportTable, file_name: String, body: Vec<u8>) -> Response {
    tracing::debug!(?table, %file_name, bytes = body.len(), "Serving CSV export");
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export(
    state: AppState,
    query: BrowseQuery,
    table: ExportTable,
) -> Result<Response, AppError> {
    let request = query.into_request()?;
    let file_name = table.file_name(request.criteria.month);

    let body = run_blocking(state, move |state| {
        let FilterOutcome { dso, stars } = services::apply_filters(
            state.repository()?,
            &request.criteria,
            state.filter_options,
        )?;
        Ok(match table {
            ExportTable::Dso => export_csv(&dso, request.mode)?,
            ExportTable::Stars => export_csv(&stars, request.mode)?,
        })
    })
    .await?;

    Ok(csv_response(table, file_name, body))
}

/// GET /v1/export/dso.csv
pub async fn export_dso(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, AppError> {
    export(state, query, ExportTable::Dso).await
}

/// GET /v1/export/stars.csv
pub async fn export_stars(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, AppError> {
    export(state, query, ExportTable::Stars).await
}
