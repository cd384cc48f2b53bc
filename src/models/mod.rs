pub mod book;
pub mod hold;
pub mod loan;
pub mod member;

pub use book::Book;
pub use hold::Hold;
pub use loan::Loan;
pub use member::Member;
