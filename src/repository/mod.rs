//! Repository layer for book storage

pub mod books;
pub mod memory;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::DatabaseConfig, error::AppResult, models::book::Book};

pub use books::BooksRepository;
pub use memory::InMemoryBookStore;

/// Storage operations the catalog needs, against a single table keyed by ISBN.
///
/// Implementations must reject a second row with an existing ISBN from
/// `insert` with [`AppError::Constraint`](crate::error::AppError::Constraint),
/// atomically with respect to concurrent inserts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new row
    async fn insert(&self, book: &Book) -> AppResult<()>;

    /// Exact match on ISBN
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Every row, in a stable order
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    /// Rows whose title contains `term`, ignoring ASCII case only
    /// (SQLite `LIKE` does not fold non-ASCII letters).
    async fn find_by_title_substring(&self, term: &str) -> AppResult<Vec<Book>>;

    /// Overwrite every non-key field of the row with the same ISBN.
    /// Returns false when no row matched.
    async fn update(&self, book: &Book) -> AppResult<bool>;

    /// Remove the row with this ISBN. Returns false when no row matched.
    async fn delete(&self, isbn: &str) -> AppResult<bool>;
}

/// Open the SQLite pool described by the configuration, creating the
/// database file if it does not exist yet.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the books table if it is missing
pub async fn init_schema(pool: &Pool<Sqlite>) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            isbn TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            short_description TEXT NOT NULL DEFAULT '',
            page_count INTEGER NOT NULL,
            release_date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
