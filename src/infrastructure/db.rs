use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn exec(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Catalog
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT,
            isbn TEXT,
            publisher TEXT,
            publication_year INTEGER,
            shelf_location TEXT,
            status TEXT NOT NULL DEFAULT 'available', -- 'available', 'borrowed', 'held'
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;
    exec(db, "CREATE INDEX IF NOT EXISTS idx_books_status ON books(status)").await?;
    exec(db, "CREATE INDEX IF NOT EXISTS idx_books_isbn ON books(isbn)").await?;

    // Patrons
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL, -- 'student', 'teacher', 'class', 'outside'
            email TEXT,
            grade TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_members_category ON members(category)",
    )
    .await?;

    // Circulation. One open loan per book is enforced by the checkout workflow;
    // loan rows only leave through the purge.
    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS loans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            borrow_date TEXT NOT NULL,
            due_date TEXT NOT NULL,
            return_date TEXT,
            fine INTEGER NOT NULL DEFAULT 0,
            fine_paid BOOLEAN NOT NULL DEFAULT 0,
            paid_amount INTEGER NOT NULL DEFAULT 0,
            excluded_days INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE RESTRICT,
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;
    exec(db, "CREATE INDEX IF NOT EXISTS idx_loans_book_id ON loans(book_id)").await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_loans_member_id ON loans(member_id)",
    )
    .await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_loans_return_date ON loans(return_date)",
    )
    .await?;

    exec(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS holds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER NOT NULL,
            member_id INTEGER NOT NULL,
            placed_on TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active', -- 'active', 'fulfilled', 'cancelled'
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE,
            FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;
    exec(
        db,
        "CREATE INDEX IF NOT EXISTS idx_holds_book_status ON holds(book_id, status)",
    )
    .await?;

    Ok(())
}
