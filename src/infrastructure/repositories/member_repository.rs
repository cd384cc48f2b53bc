//! SeaORM implementation of MemberRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, MemberFilter, MemberRepository};
use crate::models::member::{ActiveModel, Column, Entity as MemberEntity, Member, MemberInput};

pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> Result<ActiveModel, DomainError> {
        let model = MemberEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("Member"))?;
        Ok(model.into())
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn find_all(&self, filter: MemberFilter) -> Result<Vec<Member>, DomainError> {
        let mut query = MemberEntity::find();

        if let Some(category) = filter.category {
            query = query.filter(Column::Category.eq(category.as_str()));
        }

        if let Some(is_active) = filter.is_active {
            query = query.filter(Column::IsActive.eq(is_active));
        }

        let members = query.order_by_asc(Column::Name).all(&self.db).await?;
        members.into_iter().map(Member::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DomainError> {
        MemberEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    async fn create(&self, input: MemberInput) -> Result<Member, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_member = ActiveModel {
            name: Set(input.name),
            category: Set(input.category.as_str().to_owned()),
            email: Set(input.email),
            grade: Set(input.grade),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_member.insert(&self.db).await?;
        Member::try_from(model)
    }

    async fn update(&self, id: i32, input: MemberInput) -> Result<Member, DomainError> {
        let mut active = self.load(id).await?;

        active.name = Set(input.name);
        active.category = Set(input.category.as_str().to_owned());
        active.email = Set(input.email);
        active.grade = Set(input.grade);
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Member::try_from(model)
    }

    async fn deactivate(&self, id: i32) -> Result<Member, DomainError> {
        let mut active = self.load(id).await?;
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Member::try_from(model)
    }
}
