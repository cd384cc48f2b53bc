//! SeaORM implementation of LoanRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, LoanFilter, LoanRepository, LoanUpdate, NewLoan};
use crate::models::book::Entity as BookEntity;
use crate::models::loan::{
    ActiveModel, Column, Entity as LoanEntity, Loan, LoanWithDetails, amount_to_db,
};
use crate::models::member::{self, Entity as MemberEntity};

pub struct SeaOrmLoanRepository {
    db: DatabaseConnection,
}

impl SeaOrmLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn filter_condition(filter: &LoanFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(book_id) = filter.book_id {
        condition = condition.add(Column::BookId.eq(book_id));
    }

    if let Some(member_id) = filter.member_id {
        condition = condition.add(Column::MemberId.eq(member_id));
    }

    match filter.open {
        Some(true) => condition = condition.add(Column::ReturnDate.is_null()),
        Some(false) => condition = condition.add(Column::ReturnDate.is_not_null()),
        None => {}
    }

    if let Some(day) = filter.overdue_on {
        condition = condition
            .add(Column::ReturnDate.is_null())
            .add(Column::DueDate.lt(day));
    }

    if filter.unpaid_fines {
        condition = condition
            .add(Column::ReturnDate.is_not_null())
            .add(Column::Fine.gt(0))
            .add(Column::FinePaid.eq(false));
    }

    condition
}

#[async_trait]
impl LoanRepository for SeaOrmLoanRepository {
    async fn find_all(&self, filter: LoanFilter) -> Result<Vec<LoanWithDetails>, DomainError> {
        let loans_with_books = LoanEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(Column::BorrowDate)
            .order_by_desc(Column::Id)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        let member_ids: Vec<i32> = loans_with_books.iter().map(|(l, _)| l.member_id).collect();

        let mut member_names: HashMap<i32, String> = HashMap::new();
        if !member_ids.is_empty() {
            let members = MemberEntity::find()
                .filter(member::Column::Id.is_in(member_ids))
                .all(&self.db)
                .await?;
            for m in members {
                member_names.insert(m.id, m.name);
            }
        }

        loans_with_books
            .into_iter()
            .map(|(loan, book)| {
                let book_title = book
                    .map(|b| b.title)
                    .unwrap_or_else(|| "Unknown".to_string());
                let member_name = member_names
                    .get(&loan.member_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());

                Ok(LoanWithDetails {
                    loan: Loan::try_from(loan)?,
                    book_title,
                    member_name,
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Loan>, DomainError> {
        LoanEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Loan::try_from)
            .transpose()
    }

    async fn find_open_by_book(&self, book_id: i32) -> Result<Option<Loan>, DomainError> {
        LoanEntity::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::ReturnDate.is_null())
            .one(&self.db)
            .await?
            .map(Loan::try_from)
            .transpose()
    }

    async fn create(&self, input: NewLoan) -> Result<Loan, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_loan = ActiveModel {
            book_id: Set(input.book_id),
            member_id: Set(input.member_id),
            borrow_date: Set(input.borrow_date),
            due_date: Set(input.due_date),
            return_date: Set(None),
            fine: Set(0),
            fine_paid: Set(false),
            paid_amount: Set(0),
            excluded_days: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_loan.insert(&self.db).await?;
        Loan::try_from(model)
    }

    async fn update(&self, id: i32, update: LoanUpdate) -> Result<Loan, DomainError> {
        let existing = LoanEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("Loan"))?;

        let mut active: ActiveModel = existing.into();

        if let Some(due_date) = update.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(return_date) = update.return_date {
            active.return_date = Set(Some(return_date));
        }
        if let Some(fine) = update.fine {
            active.fine = Set(amount_to_db(fine)?);
        }
        if let Some(fine_paid) = update.fine_paid {
            active.fine_paid = Set(fine_paid);
        }
        if let Some(paid_amount) = update.paid_amount {
            active.paid_amount = Set(amount_to_db(paid_amount)?);
        }
        if let Some(excluded_days) = update.excluded_days {
            active.excluded_days = Set(amount_to_db(excluded_days)?);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Loan::try_from(model)
    }

    async fn purge_returned(&self, before: NaiveDate) -> Result<u64, DomainError> {
        let settled = Condition::any()
            .add(Column::Fine.eq(0))
            .add(Column::FinePaid.eq(true));

        let result = LoanEntity::delete_many()
            .filter(Column::ReturnDate.is_not_null())
            .filter(Column::ReturnDate.lt(before))
            .filter(settled)
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
