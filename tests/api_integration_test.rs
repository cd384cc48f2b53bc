use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Local};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

use school_library::config::Config;
use school_library::domain::MemberCategory;
use school_library::infrastructure::AppState;
use school_library::models::book::BookInput;
use school_library::models::member::MemberInput;
use school_library::services::{catalog_service, loan_service};
use school_library::{db, server};

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn test_app(state: AppState) -> Router {
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        cors_allowed_origins: vec![],
        seed_demo: false,
    };
    server::build_router(state, &config)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_member(app: &Router, name: &str, category: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/members",
        Some(json!({ "name": name, "category": category })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["member"]["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, title: &str) -> i64 {
    let (status, body) = send(app, "POST", "/api/books", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["book"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app(setup_test_state().await);

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_validation_and_not_found() {
    let app = test_app(setup_test_state().await);

    let (status, body) = send(&app, "POST", "/api/books", Some(json!({ "title": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/members",
        Some(json!({ "name": "Nobody", "category": "principal" })),
    )
    .await;
    assert!(status.is_client_error());

    let (status, body) = send(&app, "GET", "/api/books/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");

    let (status, _) = send(&app, "GET", "/api/members/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/loans/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_renew_checkin_flow() {
    let app = test_app(setup_test_state().await);
    let member_id = create_member(&app, "Ada", "student").await;
    let book_id = create_book(&app, "Flatland").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": member_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let today = Local::now().date_naive();
    let due = (today + Duration::days(15)).to_string();
    assert_eq!(body["loan"]["due_date"], due);

    // Second checkout of the same book
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": member_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Fifteen days before the due date is outside the renewal window
    let (status, body) = send(&app, "POST", &format!("/api/books/{}/renew", book_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("too early"));

    let (status, body) = send(&app, "GET", &format!("/api/books/{}/checkin", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requires_leave_days"], false);
    assert_eq!(body["preview"]["assessment"]["fine"], 0);

    let (status, body) = send(&app, "POST", &format!("/api/books/{}/checkin", book_id), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["loan"]["fine"], 0);
    assert_eq!(body["loan"]["fine_paid"], true);
    assert_eq!(body["loan"]["return_date"], today.to_string());

    let (_, body) = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(body["book"]["status"], "available");

    // Nothing left to check in
    let (status, _) = send(&app, "POST", &format!("/api/books/{}/checkin", book_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_overdue_checkin_and_payment() {
    let state = setup_test_state().await;
    let member = catalog_service::create_member(
        &state,
        MemberInput {
            name: "Late Larry".to_string(),
            category: MemberCategory::Student,
            email: None,
            grade: Some("8A".to_string()),
            is_active: None,
        },
    )
    .await
    .unwrap();
    let book = catalog_service::create_book(
        &state,
        BookInput {
            title: "Moby Dick".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let today = Local::now().date_naive();
    let loan = loan_service::check_out(&state, book.id, member.id, today - Duration::days(20))
        .await
        .unwrap();

    let app = test_app(state);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/reports/overdue?as_of={}", today),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["loans"][0]["days_overdue"], 5);
    assert_eq!(body["loans"][0]["fine_if_returned_today"], 7);

    // A leave day after today is rejected and the loan stays open
    let tomorrow = (today + Duration::days(1)).to_string();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkin", book.id),
        Some(json!({ "excluded_dates": [tomorrow] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkin", book.id),
        Some(json!({ "excluded_dates": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["assessment"]["effective_days"], 20);
    assert_eq!(body["loan"]["fine"], 7);
    assert_eq!(body["loan"]["fine_paid"], false);

    let (_, body) = send(&app, "GET", "/api/reports/fines", None).await;
    assert_eq!(body["total_outstanding"], 7);

    let payments = format!("/api/loans/{}/payments", loan.id);
    let (status, _) = send(&app, "POST", &payments, Some(json!({ "amount": 10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", &payments, Some(json!({ "amount": 7 }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["loan"]["fine_paid"], true);
    assert_eq!(body["outstanding_fine"], 0);

    let (_, body) = send(&app, "GET", "/api/reports/fines", None).await;
    assert_eq!(body["total_outstanding"], 0);
}

#[tokio::test]
async fn test_holds_over_http() {
    let app = test_app(setup_test_state().await);
    let holder = create_member(&app, "Holder", "teacher").await;
    let other = create_member(&app, "Other", "class").await;
    let book_id = create_book(&app, "Wanted").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/holds",
        Some(json!({ "book_id": book_id, "member_id": holder })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let hold_id = body["hold"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": other })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "POST", &format!("/api/holds/{}/cancel", hold_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hold"]["status"], "cancelled");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": other })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_summary_and_purge() {
    let app = test_app(setup_test_state().await);
    let member_id = create_member(&app, "Reader", "outside").await;
    let returned = create_book(&app, "Returned").await;
    let out = create_book(&app, "Out").await;

    for book_id in [returned, out] {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/books/{}/checkout", book_id),
            Some(json!({ "member_id": member_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    send(&app, "POST", &format!("/api/books/{}/checkin", returned), None).await;

    let (status, body) = send(&app, "GET", "/api/reports/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    let summary = &body["summary"];
    assert_eq!(summary["total_books"], 2);
    assert_eq!(summary["open_loans"], 1);
    assert_eq!(summary["overdue_loans"], 0);
    assert_eq!(summary["books_by_status"]["borrowed"], 1);
    assert_eq!(summary["active_members"], 1);

    let tomorrow = (Local::now().date_naive() + Duration::days(1)).to_string();
    let (status, body) = send(
        &app,
        "POST",
        "/api/loans/purge",
        Some(json!({ "before": tomorrow })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["purged"], 1);

    let (_, body) = send(&app, "GET", "/api/loans", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["loans"][0]["book_title"], "Out");
}

#[tokio::test]
async fn test_checkin_rejects_malformed_body_and_keeps_loan_open() {
    let app = test_app(setup_test_state().await);
    let member_id = create_member(&app, "Careful", "student").await;
    let book_id = create_book(&app, "Fragile").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": member_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let checkin = format!("/api/books/{}/checkin", book_id);

    let (status, body) = send(
        &app,
        "POST",
        &checkin,
        Some(json!({ "excluded_dates": ["2024-13-01"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(body["error"].as_str().unwrap().contains("Invalid check-in request"));

    let (status, _) = send(
        &app,
        "POST",
        &checkin,
        Some(json!({ "excluded_dates": "2024-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not JSON, and no content type
    let req = Request::builder()
        .method("POST")
        .uri(checkin.as_str())
        .body(Body::from("excluded_dates=2024-01-01"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The loan is still open
    let (status, body) = send(&app, "GET", &checkin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["preview"]["loan"]["return_date"].is_null());
    let (_, body) = send(&app, "GET", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(body["book"]["status"], "borrowed");

    let (status, body) = send(&app, "POST", &checkin, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["loan"]["excluded_days"], 0);
}

#[tokio::test]
async fn test_delete_book_with_loan_history_is_refused() {
    let app = test_app(setup_test_state().await);
    let member_id = create_member(&app, "Reader", "student").await;
    let book_id = create_book(&app, "Kept").await;

    send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": member_id })),
    )
    .await;
    send(&app, "POST", &format!("/api/books/{}/checkin", book_id), None).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/books/{}", book_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", &format!("/api/loans?book_id={}", book_id), None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_member_update_cannot_deactivate_borrower() {
    let app = test_app(setup_test_state().await);
    let member_id = create_member(&app, "Holder Of Books", "teacher").await;
    let book_id = create_book(&app, "Out Again").await;

    send(
        &app,
        "POST",
        &format!("/api/books/{}/checkout", book_id),
        Some(json!({ "member_id": member_id })),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/members/{}", member_id),
        Some(json!({ "name": "Holder Of Books", "category": "teacher", "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", &format!("/api/members/{}", member_id), None).await;
    assert_eq!(body["member"]["is_active"], true);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app(setup_test_state().await);

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let paths = &body["paths"];
    for path in [
        "/api/books/{id}/checkin",
        "/api/members/{id}",
        "/api/loans/{id}/payments",
        "/api/loans/purge",
        "/api/holds",
        "/api/holds/{id}/cancel",
        "/api/reports/fines",
    ] {
        assert!(paths[path].is_object(), "missing {}", path);
    }
    assert!(paths["/api/members/{id}"]["delete"].is_object());
}
