//! Report Service - circulation figures for the front desk

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::loan_policy;
use crate::domain::{BookFilter, DomainError, LoanFilter, MemberFilter};
use crate::infrastructure::AppState;
use crate::models::book::BookStatus;
use crate::models::loan::LoanWithDetails;

#[derive(Debug, Clone, Serialize)]
pub struct CirculationSummary {
    pub date: NaiveDate,
    pub total_books: usize,
    pub books_by_status: BTreeMap<&'static str, usize>,
    pub active_members: usize,
    pub open_loans: usize,
    pub overdue_loans: usize,
    pub outstanding_fines: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverdueLoan {
    #[serde(flatten)]
    pub details: LoanWithDetails,
    pub days_overdue: i64,
    /// Fine if the book came back today with no leave days excluded
    pub fine_if_returned_today: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutstandingFine {
    #[serde(flatten)]
    pub details: LoanWithDetails,
    pub balance: u32,
}

pub async fn circulation_summary(
    state: &AppState,
    today: NaiveDate,
) -> Result<CirculationSummary, DomainError> {
    let books = state.book_repo.find_all(BookFilter::default()).await?;

    let mut books_by_status: BTreeMap<&'static str, usize> =
        BookStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for book in &books {
        *books_by_status.entry(book.status.as_str()).or_default() += 1;
    }

    let active_members = state
        .member_repo
        .find_all(MemberFilter {
            is_active: Some(true),
            ..Default::default()
        })
        .await?
        .len();

    let open_loans = state
        .loan_repo
        .find_all(LoanFilter {
            open: Some(true),
            ..Default::default()
        })
        .await?;
    let overdue_loans = open_loans
        .iter()
        .filter(|l| l.loan.due_date < today)
        .count();

    let outstanding_fines: u64 = state
        .loan_repo
        .find_all(LoanFilter {
            unpaid_fines: true,
            ..Default::default()
        })
        .await?
        .iter()
        .map(|l| u64::from(l.loan.outstanding_fine()))
        .sum();

    Ok(CirculationSummary {
        date: today,
        total_books: books.len(),
        books_by_status,
        active_members,
        open_loans: open_loans.len(),
        overdue_loans,
        outstanding_fines,
    })
}

/// Open loans past their due date, most overdue first.
pub async fn overdue_loans(
    state: &AppState,
    today: NaiveDate,
) -> Result<Vec<OverdueLoan>, DomainError> {
    let loans = state
        .loan_repo
        .find_all(LoanFilter {
            overdue_on: Some(today),
            ..Default::default()
        })
        .await?;

    let categories: HashMap<i32, loan_policy::MemberCategory> = state
        .member_repo
        .find_all(MemberFilter::default())
        .await?
        .into_iter()
        .map(|m| (m.id, m.category))
        .collect();

    let mut report = Vec::with_capacity(loans.len());
    for details in loans {
        let category = categories
            .get(&details.loan.member_id)
            .copied()
            .ok_or(DomainError::NotFound("Member"))?;
        let assessment = loan_policy::assess_fine(details.loan.borrow_date, today, category, 0);

        report.push(OverdueLoan {
            days_overdue: (today - details.loan.due_date).num_days(),
            fine_if_returned_today: assessment.fine,
            details,
        });
    }

    report.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
    Ok(report)
}

/// Returned loans whose fine is not fully paid.
pub async fn outstanding_fines(state: &AppState) -> Result<Vec<OutstandingFine>, DomainError> {
    let loans = state
        .loan_repo
        .find_all(LoanFilter {
            unpaid_fines: true,
            ..Default::default()
        })
        .await?;

    Ok(loans
        .into_iter()
        .map(|details| OutstandingFine {
            balance: details.loan.outstanding_fine(),
            details,
        })
        .filter(|f| f.balance > 0)
        .collect())
}
