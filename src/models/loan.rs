use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub borrow_date: Date,
    pub due_date: Date,
    /// NULL while the book is still out
    pub return_date: Option<Date>,
    pub fine: i32,
    pub fine_paid: bool,
    pub paid_amount: i32,
    pub excluded_days: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Member,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub member_id: i32,
    pub borrow_date: Date,
    pub due_date: Date,
    pub return_date: Option<Date>,
    pub fine: u32,
    pub fine_paid: bool,
    pub paid_amount: u32,
    pub excluded_days: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// Unpaid part of the fine. Open loans have nothing to pay yet.
    pub fn outstanding_fine(&self) -> u32 {
        if self.is_open() || self.fine_paid {
            return 0;
        }
        self.fine.saturating_sub(self.paid_amount)
    }
}

fn amount_from_db(value: i32, field: &str) -> Result<u32, DomainError> {
    u32::try_from(value)
        .map_err(|_| DomainError::Internal(format!("Negative {} stored on loan: {}", field, value)))
}

/// Convert an amount to its column representation.
pub fn amount_to_db(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::Validation(format!("Amount {} is too large", value)))
}

impl TryFrom<Model> for Loan {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            book_id: model.book_id,
            member_id: model.member_id,
            borrow_date: model.borrow_date,
            due_date: model.due_date,
            return_date: model.return_date,
            fine: amount_from_db(model.fine, "fine")?,
            fine_paid: model.fine_paid,
            paid_amount: amount_from_db(model.paid_amount, "paid amount")?,
            excluded_days: amount_from_db(model.excluded_days, "excluded day count")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Loan joined with the titles a circulation desk reads.
#[derive(Debug, Clone, Serialize)]
pub struct LoanWithDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub member_name: String,
}
