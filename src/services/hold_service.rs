//! Hold Service - reservations on available books

use chrono::NaiveDate;

use crate::domain::{DomainError, HoldFilter};
use crate::infrastructure::AppState;
use crate::models::book::BookStatus;
use crate::models::hold::{Hold, HoldStatus};

pub async fn list_holds(state: &AppState, filter: HoldFilter) -> Result<Vec<Hold>, DomainError> {
    state.hold_repo.find_all(filter).await
}

/// Set an available book aside for one member.
pub async fn place_hold(
    state: &AppState,
    book_id: i32,
    member_id: i32,
    today: NaiveDate,
) -> Result<Hold, DomainError> {
    let book = state
        .book_repo
        .find_by_id(book_id)
        .await?
        .ok_or(DomainError::NotFound("Book"))?;
    let member = state
        .member_repo
        .find_by_id(member_id)
        .await?
        .ok_or(DomainError::NotFound("Member"))?;

    if !member.is_active {
        return Err(DomainError::InvalidState(format!(
            "Member '{}' is not active",
            member.name
        )));
    }

    if book.status != BookStatus::Available {
        return Err(DomainError::InvalidState(format!(
            "'{}' cannot be held while {}",
            book.title, book.status
        )));
    }

    if state.hold_repo.find_active_by_book(book.id).await?.is_some() {
        return Err(DomainError::InvalidState(format!(
            "'{}' already has an active hold",
            book.title
        )));
    }

    let hold = state.hold_repo.create(book.id, member.id, today).await?;
    state.book_repo.set_status(book.id, BookStatus::Held).await?;

    tracing::info!("Hold {} placed on book {} for member {}", hold.id, book.id, member.id);
    Ok(hold)
}

/// Cancel an active hold and put the book back on the shelf.
pub async fn cancel_hold(state: &AppState, hold_id: i32) -> Result<Hold, DomainError> {
    let hold = state
        .hold_repo
        .find_by_id(hold_id)
        .await?
        .ok_or(DomainError::NotFound("Hold"))?;

    if hold.status != HoldStatus::Active {
        return Err(DomainError::InvalidState(format!(
            "Hold is already {}",
            hold.status.as_str()
        )));
    }

    let cancelled = release(state, &hold).await?;
    tracing::info!("Hold {} on book {} cancelled", hold.id, hold.book_id);
    Ok(cancelled)
}

/// Cancel every active hold of a member, freeing the held books.
/// Returns the number of holds cancelled.
pub async fn cancel_member_holds(state: &AppState, member_id: i32) -> Result<usize, DomainError> {
    let holds = state
        .hold_repo
        .find_all(HoldFilter {
            member_id: Some(member_id),
            status: Some(HoldStatus::Active),
            ..Default::default()
        })
        .await?;

    for hold in &holds {
        release(state, hold).await?;
    }

    if !holds.is_empty() {
        tracing::info!("Cancelled {} hold(s) of member {}", holds.len(), member_id);
    }
    Ok(holds.len())
}

async fn release(state: &AppState, hold: &Hold) -> Result<Hold, DomainError> {
    let cancelled = state.hold_repo.set_status(hold.id, HoldStatus::Cancelled).await?;

    if let Some(book) = state.book_repo.find_by_id(hold.book_id).await?
        && book.status == BookStatus::Held
    {
        state.book_repo.set_status(book.id, BookStatus::Available).await?;
    }

    Ok(cancelled)
}
