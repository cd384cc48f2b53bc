//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, HoldRepository, LoanRepository, MemberRepository};
use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmHoldRepository, SeaOrmLoanRepository, SeaOrmMemberRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub book_repo: Arc<dyn BookRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub loan_repo: Arc<dyn LoanRepository>,
    pub hold_repo: Arc<dyn HoldRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let member_repo = Arc::new(SeaOrmMemberRepository::new(db.clone()));
        let loan_repo = Arc::new(SeaOrmLoanRepository::new(db.clone()));
        let hold_repo = Arc::new(SeaOrmHoldRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            member_repo,
            loan_repo,
            hold_repo,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
