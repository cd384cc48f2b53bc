//! Loan Service - circulation workflows without HTTP layer
//!
//! Checkout, check-in, renewal and fine payment. Each workflow is one
//! sequential chain of repository calls; the date is passed in so the
//! caller decides what "today" is.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::loan_policy::{self, FineAssessment, MemberCategory, RenewalDecision};
use crate::domain::{DomainError, LoanFilter, LoanUpdate, NewLoan};
use crate::infrastructure::AppState;
use crate::models::book::{Book, BookStatus};
use crate::models::hold::HoldStatus;
use crate::models::loan::{Loan, LoanWithDetails};
use crate::models::member::Member;

/// What check-in would charge if the book came back today.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinPreview {
    pub loan: Loan,
    pub member_category: MemberCategory,
    pub assessment: FineAssessment,
    /// Leave days may be picked from this inclusive range
    pub excluded_range: (NaiveDate, NaiveDate),
}

/// Result of a finalized check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckinReceipt {
    pub loan: Loan,
    pub assessment: FineAssessment,
}

async fn find_book(state: &AppState, book_id: i32) -> Result<Book, DomainError> {
    state
        .book_repo
        .find_by_id(book_id)
        .await?
        .ok_or(DomainError::NotFound("Book"))
}

async fn find_member(state: &AppState, member_id: i32) -> Result<Member, DomainError> {
    state
        .member_repo
        .find_by_id(member_id)
        .await?
        .ok_or(DomainError::NotFound("Member"))
}

/// The book's open loan together with its borrower.
async fn open_loan(state: &AppState, book: &Book) -> Result<(Loan, Member), DomainError> {
    let loan = state
        .loan_repo
        .find_open_by_book(book.id)
        .await?
        .ok_or_else(|| {
            DomainError::InvalidState(format!("'{}' has no open loan", book.title))
        })?;
    let member = find_member(state, loan.member_id).await?;
    Ok((loan, member))
}

pub async fn list_loans(
    state: &AppState,
    filter: LoanFilter,
) -> Result<Vec<LoanWithDetails>, DomainError> {
    state.loan_repo.find_all(filter).await
}

pub async fn get_loan(state: &AppState, loan_id: i32) -> Result<Loan, DomainError> {
    state
        .loan_repo
        .find_by_id(loan_id)
        .await?
        .ok_or(DomainError::NotFound("Loan"))
}

/// Lend a book to a member.
///
/// A held book is only issued to the member holding it, and that hold is
/// marked fulfilled.
pub async fn check_out(
    state: &AppState,
    book_id: i32,
    member_id: i32,
    today: NaiveDate,
) -> Result<Loan, DomainError> {
    let book = find_book(state, book_id).await?;
    let member = find_member(state, member_id).await?;

    if !member.is_active {
        return Err(DomainError::InvalidState(format!(
            "Member '{}' is not active",
            member.name
        )));
    }

    let hold = match book.status {
        BookStatus::Available => None,
        BookStatus::Borrowed => {
            return Err(DomainError::InvalidState(format!(
                "'{}' is currently borrowed",
                book.title
            )));
        }
        BookStatus::Held => match state.hold_repo.find_active_by_book(book.id).await? {
            Some(hold) if hold.member_id == member.id => Some(hold),
            Some(_) => {
                return Err(DomainError::InvalidState(format!(
                    "'{}' is on hold for another member",
                    book.title
                )));
            }
            None => None,
        },
    };

    if state.loan_repo.find_open_by_book(book.id).await?.is_some() {
        return Err(DomainError::InvalidState(format!(
            "'{}' already has an open loan",
            book.title
        )));
    }

    let due_date = today + Duration::days(loan_policy::loan_period_days(member.category));
    let loan = state
        .loan_repo
        .create(NewLoan {
            book_id: book.id,
            member_id: member.id,
            borrow_date: today,
            due_date,
        })
        .await?;

    if let Some(hold) = hold {
        state.hold_repo.set_status(hold.id, HoldStatus::Fulfilled).await?;
    }
    state.book_repo.set_status(book.id, BookStatus::Borrowed).await?;

    tracing::info!(
        "Checked out book {} to member {} ({}), due {}",
        book.id,
        member.id,
        member.category,
        due_date
    );

    Ok(loan)
}

/// Fine the open loan of `book_id` would carry if returned on `today`.
pub async fn preview_checkin(
    state: &AppState,
    book_id: i32,
    today: NaiveDate,
) -> Result<CheckinPreview, DomainError> {
    let book = find_book(state, book_id).await?;
    let (loan, member) = open_loan(state, &book).await?;

    let assessment = loan_policy::assess_fine(loan.borrow_date, today, member.category, 0);

    Ok(CheckinPreview {
        excluded_range: (loan.borrow_date, today),
        loan,
        member_category: member.category,
        assessment,
    })
}

/// Return a book, charging the fine left after `excluded_dates` are taken off.
pub async fn check_in(
    state: &AppState,
    book_id: i32,
    excluded_dates: &[NaiveDate],
    today: NaiveDate,
) -> Result<CheckinReceipt, DomainError> {
    let book = find_book(state, book_id).await?;
    let (loan, member) = open_loan(state, &book).await?;

    let excluded_days = loan_policy::tally_excluded_days(loan.borrow_date, today, excluded_dates)?;
    let assessment =
        loan_policy::assess_fine(loan.borrow_date, today, member.category, excluded_days);

    let loan = state
        .loan_repo
        .update(
            loan.id,
            LoanUpdate {
                return_date: Some(today),
                fine: Some(assessment.fine),
                fine_paid: Some(assessment.fine == 0),
                excluded_days: Some(excluded_days),
                ..Default::default()
            },
        )
        .await?;

    state.book_repo.set_status(book.id, BookStatus::Available).await?;

    tracing::info!(
        "Checked in book {} from member {}: {} effective day(s), fine {}",
        book.id,
        member.id,
        assessment.effective_days,
        assessment.fine
    );

    Ok(CheckinReceipt { loan, assessment })
}

/// Extend the open loan of `book_id`. Only the due date changes.
pub async fn renew(state: &AppState, book_id: i32, today: NaiveDate) -> Result<Loan, DomainError> {
    let book = find_book(state, book_id).await?;

    if book.status != BookStatus::Borrowed {
        return Err(DomainError::InvalidState(format!(
            "'{}' is not borrowed (status: {})",
            book.title, book.status
        )));
    }

    let (loan, member) = open_loan(state, &book).await?;

    match loan_policy::evaluate_renewal(loan.due_date, today, member.category) {
        RenewalDecision::Permitted { new_due_date } => {
            let renewed = state
                .loan_repo
                .update(
                    loan.id,
                    LoanUpdate {
                        due_date: Some(new_due_date),
                        ..Default::default()
                    },
                )
                .await?;

            tracing::info!(
                "Renewed loan {} for book {}: due {} -> {}",
                loan.id,
                book.id,
                loan.due_date,
                new_due_date
            );
            Ok(renewed)
        }
        RenewalDecision::Rejected(reason) => {
            tracing::warn!("Renewal refused for loan {}: {}", loan.id, reason);
            Err(DomainError::InvalidState(reason.to_string()))
        }
    }
}

/// Record a payment towards a returned loan's fine.
pub async fn pay_fine(state: &AppState, loan_id: i32, amount: u32) -> Result<Loan, DomainError> {
    let loan = get_loan(state, loan_id).await?;

    if loan.is_open() {
        return Err(DomainError::InvalidState(
            "Fines are settled after the book is checked in".to_string(),
        ));
    }

    let outstanding = loan.outstanding_fine();
    if outstanding == 0 {
        return Err(DomainError::InvalidState(
            "Loan has no outstanding fine".to_string(),
        ));
    }
    if amount == 0 {
        return Err(DomainError::Validation(
            "Payment amount must be positive".to_string(),
        ));
    }
    if amount > outstanding {
        return Err(DomainError::Validation(format!(
            "Payment of {} exceeds the outstanding fine of {}",
            amount, outstanding
        )));
    }

    let paid_amount = loan.paid_amount + amount;
    let updated = state
        .loan_repo
        .update(
            loan.id,
            LoanUpdate {
                paid_amount: Some(paid_amount),
                fine_paid: Some(paid_amount >= loan.fine),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(
        "Payment of {} on loan {} ({} of {} paid)",
        amount,
        loan.id,
        paid_amount,
        loan.fine
    );

    Ok(updated)
}

/// Delete settled loans returned before `before`. Open loans always stay.
pub async fn purge_returned_loans(state: &AppState, before: NaiveDate) -> Result<u64, DomainError> {
    let removed = state.loan_repo.purge_returned(before).await?;
    tracing::info!("Purged {} returned loan(s) older than {}", removed, before);
    Ok(removed)
}
