//! Repository implementations using SeaORM

pub mod book_repository;
pub mod hold_repository;
pub mod loan_repository;
pub mod member_repository;

pub use book_repository::SeaOrmBookRepository;
pub use hold_repository::SeaOrmHoldRepository;
pub use loan_repository::SeaOrmLoanRepository;
pub use member_repository::SeaOrmMemberRepository;
