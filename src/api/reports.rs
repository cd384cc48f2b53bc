use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use serde_json::json;

use super::{ApiResult, error_response, today};
use crate::infrastructure::AppState;
use crate::services::report_service;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Report as of this day (YYYY-MM-DD) instead of today
    #[param(value_type = Option<String>)]
    pub as_of: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/reports/summary",
    params(ReportQuery),
    responses((status = 200, description = "Circulation summary"))
)]
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult {
    let summary = report_service::circulation_summary(&state, query.as_of.unwrap_or_else(today))
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "summary": summary })))
}

#[utoipa::path(
    get,
    path = "/api/reports/overdue",
    params(ReportQuery),
    responses((status = 200, description = "Open loans past their due date"))
)]
pub async fn overdue(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult {
    let loans = report_service::overdue_loans(&state, query.as_of.unwrap_or_else(today))
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "loans": loans, "total": loans.len() })))
}

#[utoipa::path(
    get,
    path = "/api/reports/fines",
    responses((status = 200, description = "Returned loans with unpaid fines"))
)]
pub async fn fines(State(state): State<AppState>) -> ApiResult {
    let fines = report_service::outstanding_fines(&state)
        .await
        .map_err(error_response)?;
    let total: u64 = fines.iter().map(|f| u64::from(f.balance)).sum();
    Ok(Json(json!({ "fines": fines, "total_outstanding": total })))
}
