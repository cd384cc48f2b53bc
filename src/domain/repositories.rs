//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DomainError;
use super::loan_policy::MemberCategory;
use crate::models::book::{Book, BookInput, BookStatus};
use crate::models::hold::{Hold, HoldStatus};
use crate::models::loan::{Loan, LoanWithDetails};
use crate::models::member::{Member, MemberInput};

/// Filter criteria for book queries
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub status: Option<BookStatus>,
    /// Matches title, author or isbn
    pub query: Option<String>,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter criteria, ordered by title
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Create a new book; it starts out available
    async fn create(&self, input: BookInput) -> Result<Book, DomainError>;

    /// Replace the catalog fields of a book
    async fn update(&self, id: i32, input: BookInput) -> Result<Book, DomainError>;

    /// Move a book to another shelf status
    async fn set_status(&self, id: i32, status: BookStatus) -> Result<Book, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Filter criteria for member queries
#[derive(Debug, Default, Clone)]
pub struct MemberFilter {
    pub category: Option<MemberCategory>,
    pub is_active: Option<bool>,
}

/// Repository trait for Member entity
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_all(&self, filter: MemberFilter) -> Result<Vec<Member>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DomainError>;

    async fn create(&self, input: MemberInput) -> Result<Member, DomainError>;

    async fn update(&self, id: i32, input: MemberInput) -> Result<Member, DomainError>;

    /// Soft delete: the member row stays for loan history
    async fn deactivate(&self, id: i32) -> Result<Member, DomainError>;
}

/// Filter criteria for loan queries
#[derive(Debug, Default, Clone)]
pub struct LoanFilter {
    pub book_id: Option<i32>,
    pub member_id: Option<i32>,
    /// `Some(true)` keeps loans without a return date, `Some(false)` returned ones
    pub open: Option<bool>,
    /// Open loans whose due date is before this day
    pub overdue_on: Option<NaiveDate>,
    /// Returned loans with a fine that is not fully paid
    pub unpaid_fines: bool,
}

/// Fields written when a loan is opened at checkout
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub book_id: i32,
    pub member_id: i32,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Partial update of a loan; `None` leaves a field untouched
#[derive(Debug, Default, Clone)]
pub struct LoanUpdate {
    pub due_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub fine: Option<u32>,
    pub fine_paid: Option<bool>,
    pub paid_amount: Option<u32>,
    pub excluded_days: Option<u32>,
}

/// Repository trait for Loan entity
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Find loans with book title and member name, newest borrow first
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<LoanWithDetails>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Loan>, DomainError>;

    /// The loan of this book that has no return date yet, if any
    async fn find_open_by_book(&self, book_id: i32) -> Result<Option<Loan>, DomainError>;

    async fn create(&self, input: NewLoan) -> Result<Loan, DomainError>;

    async fn update(&self, id: i32, update: LoanUpdate) -> Result<Loan, DomainError>;

    /// Delete settled loans returned before `before`; returns the number removed
    async fn purge_returned(&self, before: NaiveDate) -> Result<u64, DomainError>;
}

/// Filter criteria for hold queries
#[derive(Debug, Default, Clone)]
pub struct HoldFilter {
    pub book_id: Option<i32>,
    pub member_id: Option<i32>,
    pub status: Option<HoldStatus>,
}

/// Repository trait for Hold entity
#[async_trait]
pub trait HoldRepository: Send + Sync {
    async fn find_all(&self, filter: HoldFilter) -> Result<Vec<Hold>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Hold>, DomainError>;

    async fn find_active_by_book(&self, book_id: i32) -> Result<Option<Hold>, DomainError>;

    async fn create(
        &self,
        book_id: i32,
        member_id: i32,
        placed_on: NaiveDate,
    ) -> Result<Hold, DomainError>;

    async fn set_status(&self, id: i32, status: HoldStatus) -> Result<Hold, DomainError>;
}
