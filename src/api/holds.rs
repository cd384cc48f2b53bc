use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use serde_json::{Value, json};

use super::{ApiResult, error_response, today};
use crate::domain::HoldFilter;
use crate::infrastructure::AppState;
use crate::models::hold::HoldStatus;
use crate::services::hold_service;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HoldsQuery {
    pub book_id: Option<i32>,
    pub member_id: Option<i32>,
    /// active, fulfilled or cancelled
    #[param(value_type = Option<String>)]
    pub status: Option<HoldStatus>,
}

#[derive(Deserialize)]
pub struct PlaceHoldRequest {
    pub book_id: i32,
    pub member_id: i32,
}

#[utoipa::path(
    get,
    path = "/api/holds",
    params(HoldsQuery),
    responses((status = 200, description = "Holds"))
)]
pub async fn list_holds(
    State(state): State<AppState>,
    Query(query): Query<HoldsQuery>,
) -> ApiResult {
    let holds = hold_service::list_holds(
        &state,
        HoldFilter {
            book_id: query.book_id,
            member_id: query.member_id,
            status: query.status,
        },
    )
    .await
    .map_err(error_response)?;

    Ok(Json(json!({ "holds": holds, "total": holds.len() })))
}

#[utoipa::path(
    post,
    path = "/api/holds",
    responses(
        (status = 201, description = "Book set aside"),
        (status = 404, description = "Book or member not found"),
        (status = 409, description = "Book is not available")
    )
)]
pub async fn place_hold(
    State(state): State<AppState>,
    Json(payload): Json<PlaceHoldRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let hold = hold_service::place_hold(&state, payload.book_id, payload.member_id, today())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "hold": hold, "message": "Hold placed successfully" })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/holds/{id}/cancel",
    params(("id" = i32, Path, description = "Hold id")),
    responses(
        (status = 200, description = "Hold cancelled"),
        (status = 409, description = "Hold is not active")
    )
)]
pub async fn cancel_hold(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let hold = hold_service::cancel_hold(&state, id)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "hold": hold, "message": "Hold cancelled" })))
}
