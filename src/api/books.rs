use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use serde_json::{Value, json};

use super::{ApiResult, error_response};
use crate::domain::BookFilter;
use crate::infrastructure::AppState;
use crate::models::book::{BookInput, BookStatus};
use crate::services::catalog_service;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BooksQuery {
    /// available, borrowed or held
    #[param(value_type = Option<String>)]
    pub status: Option<BookStatus>,
    /// Search title, author or isbn
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    params(BooksQuery),
    responses((status = 200, description = "Books in the catalog"))
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BooksQuery>,
) -> ApiResult {
    let books = catalog_service::list_books(
        &state,
        BookFilter {
            status: params.status,
            query: params.q,
        },
    )
    .await
    .map_err(error_response)?;

    Ok(Json(json!({
        "books": books,
        "total": books.len()
    })))
}

#[utoipa::path(
    post,
    path = "/api/books",
    responses(
        (status = 201, description = "Book catalogued"),
        (status = 400, description = "Missing title")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let book = catalog_service::create_book(&state, input)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Book created successfully",
            "book": book
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let book = catalog_service::get_book(&state, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "book": book })))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Catalog fields replaced"),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<BookInput>,
) -> ApiResult {
    let book = catalog_service::update_book(&state, id, input)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({
        "message": "Book updated successfully",
        "book": book
    })))
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book removed"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has loan history")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    catalog_service::delete_book(&state, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
