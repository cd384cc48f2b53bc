//! Circulation errors shared by repositories, services and handlers.

use std::fmt;

use super::loan_policy::ExcludedDayOutOfRange;

#[derive(Debug)]
pub enum DomainError {
    /// No row with that id (carries the entity name, e.g. "Book")
    NotFound(&'static str),
    /// Request data the desk has to correct
    Validation(String),
    /// Book, loan or hold is in the wrong state for the operation
    InvalidState(String),
    Database(String),
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(entity) => write!(f, "{} not found", entity),
            DomainError::Validation(msg) | DomainError::InvalidState(msg) => f.write_str(msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::RecordNotFound(_) => DomainError::NotFound("Record"),
            other => DomainError::Database(other.to_string()),
        }
    }
}

impl From<ExcludedDayOutOfRange> for DomainError {
    fn from(e: ExcludedDayOutOfRange) -> Self {
        DomainError::Validation(e.to_string())
    }
}
