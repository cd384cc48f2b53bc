use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use serde_json::{Value, json};

use super::{ApiResult, error_response};
use crate::domain::{MemberCategory, MemberFilter};
use crate::infrastructure::AppState;
use crate::models::member::MemberInput;
use crate::services::catalog_service;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MembersQuery {
    /// student, teacher, class or outside
    #[param(value_type = Option<String>)]
    pub category: Option<MemberCategory>,
    pub active: Option<bool>,
}

// List members with optional filters
#[utoipa::path(
    get,
    path = "/api/members",
    params(MembersQuery),
    responses((status = 200, description = "Members"))
)]
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<MembersQuery>,
) -> ApiResult {
    let members = catalog_service::list_members(
        &state,
        MemberFilter {
            category: params.category,
            is_active: params.active,
        },
    )
    .await
    .map_err(error_response)?;

    Ok(Json(json!({
        "members": members,
        "total": members.len()
    })))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member"),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_member(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let member = catalog_service::get_member(&state, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "member": member })))
}

#[utoipa::path(
    post,
    path = "/api/members",
    responses(
        (status = 201, description = "Member registered"),
        (status = 400, description = "Missing name")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(input): Json<MemberInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let member = catalog_service::create_member(&state, input)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "member": member,
            "message": "Member created successfully"
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member updated"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Deactivation refused while books are on loan")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<MemberInput>,
) -> ApiResult {
    let member = catalog_service::update_member(&state, id, input)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({
        "member": member,
        "message": "Member updated successfully"
    })))
}

// Delete member (soft delete)
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member deactivated and holds cancelled"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Member still has books on loan")
    )
)]
pub async fn delete_member(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let member = catalog_service::deactivate_member(&state, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({
        "member": member,
        "message": "Member deactivated successfully"
    })))
}
