use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use serde_json::{Value, json};

use super::{ApiResult, error_response, today};
use crate::domain::{DomainError, LoanFilter};
use crate::infrastructure::AppState;
use crate::services::loan_service;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLoansQuery {
    pub book_id: Option<i32>,
    pub member_id: Option<i32>,
    /// Only open or only returned loans
    pub open: Option<bool>,
}

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub member_id: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckinRequest {
    /// Leave days that do not count towards the loan
    #[serde(default)]
    pub excluded_dates: Vec<NaiveDate>,
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub amount: u32,
}

#[derive(Deserialize)]
pub struct PurgeRequest {
    pub before: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/loans",
    params(ListLoansQuery),
    responses((status = 200, description = "Loans, newest borrow first"))
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<ListLoansQuery>,
) -> ApiResult {
    let loans = loan_service::list_loans(
        &state,
        LoanFilter {
            book_id: query.book_id,
            member_id: query.member_id,
            open: query.open,
            ..Default::default()
        },
    )
    .await
    .map_err(error_response)?;

    Ok(Json(json!({ "loans": loans, "total": loans.len() })))
}

#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    params(("id" = i32, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Loan with its outstanding fine"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let loan = loan_service::get_loan(&state, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({
        "loan": loan,
        "outstanding_fine": loan.outstanding_fine()
    })))
}

#[utoipa::path(
    post,
    path = "/api/books/{id}/checkout",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 201, description = "Loan opened"),
        (status = 404, description = "Book or member not found"),
        (status = 409, description = "Book is not available to this member")
    )
)]
pub async fn check_out(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    Json(payload): Json<CheckoutRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let loan = loan_service::check_out(&state, book_id, payload.member_id, today())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "loan": loan, "message": "Book checked out successfully" })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}/checkin",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Fine the loan would carry if returned today"),
        (status = 409, description = "Book has no open loan")
    )
)]
pub async fn preview_checkin(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> ApiResult {
    let preview = loan_service::preview_checkin(&state, book_id, today())
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "preview": preview,
        "requires_leave_days": preview.assessment.is_overdue()
    })))
}

#[utoipa::path(
    post,
    path = "/api/books/{id}/checkin",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book returned and fine recorded"),
        (status = 400, description = "Malformed body or excluded day outside the loan"),
        (status = 409, description = "Book has no open loan")
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    body: Bytes,
) -> ApiResult {
    // An empty body means no leave days; anything else has to parse.
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CheckinRequest::default()
    } else {
        serde_json::from_slice::<CheckinRequest>(&body).map_err(|e| {
            error_response(DomainError::Validation(format!(
                "Invalid check-in request: {}",
                e
            )))
        })?
    };

    let receipt = loan_service::check_in(&state, book_id, &request.excluded_dates, today())
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "loan": receipt.loan,
        "assessment": receipt.assessment,
        "message": "Book checked in successfully"
    })))
}

#[utoipa::path(
    post,
    path = "/api/books/{id}/renew",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Due date extended"),
        (status = 409, description = "Loan is overdue or the renewal window is not open")
    )
)]
pub async fn renew(State(state): State<AppState>, Path(book_id): Path<i32>) -> ApiResult {
    let loan = loan_service::renew(&state, book_id, today())
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "loan": loan, "message": "Loan renewed successfully" })))
}

#[utoipa::path(
    post,
    path = "/api/loans/{id}/payments",
    params(("id" = i32, Path, description = "Loan id")),
    responses(
        (status = 200, description = "Payment recorded"),
        (status = 400, description = "Amount is zero or exceeds the balance"),
        (status = 409, description = "Loan is open or has nothing to pay")
    )
)]
pub async fn pay_fine(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult {
    let loan = loan_service::pay_fine(&state, id, payload.amount)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({
        "loan": loan,
        "outstanding_fine": loan.outstanding_fine(),
        "message": "Payment recorded"
    })))
}

#[utoipa::path(
    post,
    path = "/api/loans/purge",
    responses((status = 200, description = "Number of settled loans removed"))
)]
pub async fn purge_loans(
    State(state): State<AppState>,
    Json(payload): Json<PurgeRequest>,
) -> ApiResult {
    let removed = loan_service::purge_returned_loans(&state, payload.before)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "purged": removed })))
}
