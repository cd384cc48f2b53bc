use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub shelf_location: Option<String>,
    #[sea_orm(default_value = "available")]
    pub status: String, // 'available', 'borrowed', 'held'
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

/// Shelf status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
    Held,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::Available, BookStatus::Borrowed, BookStatus::Held];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::Held => "held",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(BookStatus::Available),
            "borrowed" => Ok(BookStatus::Borrowed),
            "held" => Ok(BookStatus::Held),
            other => Err(format!("Unknown book status '{}'", other)),
        }
    }
}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub shelf_location: Option<String>,
    pub status: BookStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<Model> for Book {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(DomainError::Internal)?;

        Ok(Self {
            id: model.id,
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            publisher: model.publisher,
            publication_year: model.publication_year,
            shelf_location: model.shelf_location,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Catalog fields accepted when creating or editing a book.
///
/// Status is not part of the input: it only moves through circulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub shelf_location: Option<String>,
}
