//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{BookFilter, BookRepository, DomainError};
use crate::models::book::{ActiveModel, Book, BookInput, BookStatus, Column, Entity as BookEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        let mut query = BookEntity::find();

        if let Some(status) = filter.status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(q) = &filter.query
            && !q.trim().is_empty()
        {
            let q = q.trim();
            let cond = Condition::any()
                .add(Column::Title.contains(q))
                .add(Column::Author.contains(q))
                .add(Column::Isbn.contains(q));
            query = query.filter(cond);
        }

        let books = query.order_by_asc(Column::Title).all(&self.db).await?;
        books.into_iter().map(Book::try_from).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Book::try_from)
            .transpose()
    }

    async fn create(&self, input: BookInput) -> Result<Book, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_book = ActiveModel {
            title: Set(input.title),
            author: Set(input.author),
            isbn: Set(input.isbn),
            publisher: Set(input.publisher),
            publication_year: Set(input.publication_year),
            shelf_location: Set(input.shelf_location),
            status: Set(BookStatus::Available.as_str().to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_book.insert(&self.db).await?;
        Book::try_from(model)
    }

    async fn update(&self, id: i32, input: BookInput) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("Book"))?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(input.title);
        active.author = Set(input.author);
        active.isbn = Set(input.isbn);
        active.publisher = Set(input.publisher);
        active.publication_year = Set(input.publication_year);
        active.shelf_location = Set(input.shelf_location);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Book::try_from(model)
    }

    async fn set_status(&self, id: i32, status: BookStatus) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("Book"))?;

        let mut active: ActiveModel = existing.into();
        active.status = Set(status.as_str().to_owned());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;
        Book::try_from(model)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("Book"));
        }

        Ok(())
    }
}
