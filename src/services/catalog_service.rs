//! Catalog Service - books and members

use crate::domain::{BookFilter, DomainError, LoanFilter, MemberFilter};
use crate::infrastructure::AppState;
use crate::models::book::{Book, BookInput};
use crate::models::member::{Member, MemberInput};
use crate::services::hold_service;

fn require_name(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub async fn list_books(state: &AppState, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
    state.book_repo.find_all(filter).await
}

pub async fn get_book(state: &AppState, id: i32) -> Result<Book, DomainError> {
    state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound("Book"))
}

pub async fn create_book(state: &AppState, input: BookInput) -> Result<Book, DomainError> {
    require_name(&input.title, "Title")?;
    let book = state.book_repo.create(input).await?;
    tracing::info!("Catalogued book {} '{}'", book.id, book.title);
    Ok(book)
}

pub async fn update_book(state: &AppState, id: i32, input: BookInput) -> Result<Book, DomainError> {
    require_name(&input.title, "Title")?;
    state.book_repo.update(id, input).await
}

/// Remove a book from the catalog. Only books without loan history can go;
/// their loans have to be purged first.
pub async fn delete_book(state: &AppState, id: i32) -> Result<(), DomainError> {
    let book = get_book(state, id).await?;

    let loans = state
        .loan_repo
        .find_all(LoanFilter {
            book_id: Some(book.id),
            ..Default::default()
        })
        .await?;
    if let Some(details) = loans.first() {
        let reason = if details.loan.is_open() {
            "is out on loan"
        } else {
            "has loan history"
        };
        return Err(DomainError::InvalidState(format!(
            "'{}' {} and cannot be deleted",
            book.title, reason
        )));
    }

    state.book_repo.delete(book.id).await?;
    tracing::info!("Deleted book {}", book.id);
    Ok(())
}

pub async fn list_members(
    state: &AppState,
    filter: MemberFilter,
) -> Result<Vec<Member>, DomainError> {
    state.member_repo.find_all(filter).await
}

pub async fn get_member(state: &AppState, id: i32) -> Result<Member, DomainError> {
    state
        .member_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound("Member"))
}

pub async fn create_member(state: &AppState, input: MemberInput) -> Result<Member, DomainError> {
    require_name(&input.name, "Name")?;
    let member = state.member_repo.create(input).await?;
    tracing::info!("Registered member {} ({})", member.id, member.category);
    Ok(member)
}

pub async fn update_member(
    state: &AppState,
    id: i32,
    input: MemberInput,
) -> Result<Member, DomainError> {
    require_name(&input.name, "Name")?;

    let current = get_member(state, id).await?;
    let deactivating = current.is_active && input.is_active == Some(false);
    if deactivating {
        ensure_nothing_on_loan(state, &current).await?;
    }

    let member = state.member_repo.update(id, input).await?;
    if deactivating {
        hold_service::cancel_member_holds(state, member.id).await?;
        tracing::info!("Deactivated member {}", member.id);
    }
    Ok(member)
}

/// Soft-delete a member who has nothing left on loan. Their active holds
/// are cancelled.
pub async fn deactivate_member(state: &AppState, id: i32) -> Result<Member, DomainError> {
    let member = get_member(state, id).await?;
    ensure_nothing_on_loan(state, &member).await?;

    let member = state.member_repo.deactivate(member.id).await?;
    hold_service::cancel_member_holds(state, member.id).await?;
    tracing::info!("Deactivated member {}", member.id);
    Ok(member)
}

async fn ensure_nothing_on_loan(state: &AppState, member: &Member) -> Result<(), DomainError> {
    let open_loans = state
        .loan_repo
        .find_all(LoanFilter {
            member_id: Some(member.id),
            open: Some(true),
            ..Default::default()
        })
        .await?;
    if !open_loans.is_empty() {
        return Err(DomainError::InvalidState(format!(
            "Member '{}' still has {} book(s) on loan",
            member.name,
            open_loans.len()
        )));
    }
    Ok(())
}
