//! Domain layer - Pure business abstractions
//!
//! Repository traits, domain errors and the loan policy. Nothing here
//! touches Axum; SeaORM only appears as an error conversion.

pub mod errors;
pub mod loan_policy;
pub mod repositories;

pub use errors::DomainError;
pub use loan_policy::MemberCategory;
pub use repositories::*;
