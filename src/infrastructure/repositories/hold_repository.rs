//! SeaORM implementation of HoldRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, HoldFilter, HoldRepository};
use crate::models::hold::{ActiveModel, Column, Entity as HoldEntity, Hold, HoldStatus};

pub struct SeaOrmHoldRepository {
    db: DatabaseConnection,
}

impl SeaOrmHoldRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HoldRepository for SeaOrmHoldRepository {
    async fn find_all(&self, filter: HoldFilter) -> Result<Vec<Hold>, DomainError> {
        let mut query = HoldEntity::find();

        if let Some(book_id) = filter.book_id {
            query = query.filter(Column::BookId.eq(book_id));
        }
        if let Some(member_id) = filter.member_id {
            query = query.filter(Column::MemberId.eq(member_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        let holds = query
            .order_by_desc(Column::PlacedOn)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        holds.into_iter().map(Hold::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Hold>, DomainError> {
        HoldEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Hold::try_from)
            .transpose()
    }

    async fn find_active_by_book(&self, book_id: i32) -> Result<Option<Hold>, DomainError> {
        HoldEntity::find()
            .filter(Column::BookId.eq(book_id))
            .filter(Column::Status.eq(HoldStatus::Active.as_str()))
            .one(&self.db)
            .await?
            .map(Hold::try_from)
            .transpose()
    }

    async fn create(
        &self,
        book_id: i32,
        member_id: i32,
        placed_on: NaiveDate,
    ) -> Result<Hold, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_hold = ActiveModel {
            book_id: Set(book_id),
            member_id: Set(member_id),
            placed_on: Set(placed_on),
            status: Set(HoldStatus::Active.as_str().to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_hold.insert(&self.db).await?;
        Hold::try_from(model)
    }

    async fn set_status(&self, id: i32, status: HoldStatus) -> Result<Hold, DomainError> {
        let existing = HoldEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("Hold"))?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.as_str().to_owned());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Hold::try_from(model)
    }
}
