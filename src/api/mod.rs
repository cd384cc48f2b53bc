pub mod books;
pub mod health;
pub mod holds;
pub mod loan;
pub mod members;
pub mod reports;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// Error half of every handler result: status plus `{"error": ...}`
pub type ApiError = (StatusCode, Json<Value>);

pub type ApiResult<T = Json<Value>> = Result<T, ApiError>;

pub(crate) fn error_response(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::Database(_) | DomainError::Internal(_) => {
            tracing::error!("Request failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": e.to_string() })))
}

/// Calendar date the circulation desk is working on
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Circulation
        .route("/books/:id/checkout", post(loan::check_out))
        .route(
            "/books/:id/checkin",
            get(loan::preview_checkin).post(loan::check_in),
        )
        .route("/books/:id/renew", post(loan::renew))
        // Members
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Loans
        .route("/loans", get(loan::list_loans))
        .route("/loans/purge", post(loan::purge_loans))
        .route("/loans/:id", get(loan::get_loan))
        .route("/loans/:id/payments", post(loan::pay_fine))
        // Holds
        .route("/holds", get(holds::list_holds).post(holds::place_hold))
        .route("/holds/:id/cancel", post(holds::cancel_hold))
        // Reports
        .route("/reports/summary", get(reports::summary))
        .route("/reports/overdue", get(reports::overdue))
        .route("/reports/fines", get(reports::fines))
        .with_state(state)
}
