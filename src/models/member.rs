use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::loan_policy::MemberCategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: String, // 'student', 'teacher', 'class', 'outside'
    pub email: Option<String>,
    /// Class or grade label, e.g. "7B"
    pub grade: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
    #[sea_orm(has_many = "super::hold::Entity")]
    Holds,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl Related<super::hold::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub category: MemberCategory,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<Model> for Member {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let category = model.category.parse().map_err(DomainError::Internal)?;

        Ok(Self {
            id: model.id,
            name: model.name,
            category,
            email: model.email,
            grade: model.grade,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInput {
    pub name: String,
    pub category: MemberCategory,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub is_active: Option<bool>,
}
