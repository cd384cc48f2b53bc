use chrono::{Duration, Local};

use crate::domain::{BookFilter, DomainError, MemberCategory};
use crate::infrastructure::AppState;
use crate::models::book::BookInput;
use crate::models::member::MemberInput;
use crate::services::loan_service;

/// Fill an empty database with a small demo collection.
///
/// Loans are back-dated so the overdue report and check-in fines have
/// something to show.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    if !state.book_repo.find_all(BookFilter::default()).await?.is_empty() {
        tracing::info!("Database already has books, skipping demo seed");
        return Ok(());
    }

    // 1. Members
    let members = [
        ("Amara Okafor", MemberCategory::Student, Some("7B")),
        ("Mr. Lindqvist", MemberCategory::Teacher, None),
        ("Class 5A", MemberCategory::Class, Some("5A")),
        ("Community Reader", MemberCategory::Outside, None),
    ];

    let mut member_ids = Vec::with_capacity(members.len());
    for (name, category, grade) in members {
        let member = state
            .member_repo
            .create(MemberInput {
                name: name.to_owned(),
                category,
                email: None,
                grade: grade.map(str::to_owned),
                is_active: Some(true),
            })
            .await?;
        member_ids.push(member.id);
    }

    // 2. Books
    let books = [
        ("The Hobbit", "J.R.R. Tolkien", "9780547928227", "A-TOL"),
        ("Foundation", "Isaac Asimov", "9780553293357", "S-ASI"),
        ("Dune", "Frank Herbert", "9780441172719", "S-HER"),
        ("Matilda", "Roald Dahl", "9780142410370", "J-DAH"),
        ("A Brief History of Time", "Stephen Hawking", "9780553380163", "530-HAW"),
    ];

    let mut book_ids = Vec::with_capacity(books.len());
    for (title, author, isbn, shelf) in books {
        let book = state
            .book_repo
            .create(BookInput {
                title: title.to_owned(),
                author: Some(author.to_owned()),
                isbn: Some(isbn.to_owned()),
                publisher: None,
                publication_year: None,
                shelf_location: Some(shelf.to_owned()),
            })
            .await?;
        book_ids.push(book.id);
    }

    // 3. Loans: one recent, one overdue student loan, one long teacher loan
    let today = Local::now().date_naive();
    let loans = [
        (book_ids[0], member_ids[0], today - Duration::days(3)),
        (book_ids[1], member_ids[0], today - Duration::days(20)),
        (book_ids[2], member_ids[1], today - Duration::days(45)),
    ];
    for (book_id, member_id, borrowed_on) in loans {
        loan_service::check_out(state, book_id, member_id, borrowed_on).await?;
    }

    tracing::info!(
        "Seeded {} members, {} books and {} loans",
        member_ids.len(),
        book_ids.len(),
        loans.len()
    );

    Ok(())
}
