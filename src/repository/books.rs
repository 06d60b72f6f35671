//! SQLite-backed book storage

use async_trait::async_trait;
use sqlx::{error::DatabaseError, sqlite::SqliteRow, Pool, Row, Sqlite};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

const BOOK_COLUMNS: &str = "isbn, title, author, short_description, page_count, release_date";

/// Escape LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// SQLITE_CONSTRAINT_PRIMARYKEY and SQLITE_CONSTRAINT_UNIQUE
fn is_duplicate_key(err: &dyn DatabaseError) -> bool {
    err.is_unique_violation() || matches!(err.code().as_deref(), Some("1555") | Some("2067"))
}

fn book_from_row(row: &SqliteRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        isbn: row.try_get("isbn")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        short_description: row.try_get("short_description")?,
        page_count: row.try_get("page_count")?,
        release_date: row.try_get("release_date")?,
    })
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn insert(&self, book: &Book) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO books (isbn, title, author, short_description, page_count, release_date)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.short_description)
        .bind(book.page_count)
        .bind(book.release_date)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if is_duplicate_key(e.as_ref()) => Err(AppError::Constraint(
                format!("Book {} already exists", book.isbn),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM books WHERE isbn = ? LIMIT 1",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.as_ref().map(book_from_row).transpose()?)
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&format!("SELECT {} FROM books ORDER BY isbn", BOOK_COLUMNS))
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.iter().map(book_from_row).collect::<Result<_, _>>()?)
    }

    async fn find_by_title_substring(&self, term: &str) -> AppResult<Vec<Book>> {
        let mut conn = self.pool.acquire().await?;
        // LIKE is case-insensitive for ASCII in SQLite
        let rows = sqlx::query(&format!(
            "SELECT {} FROM books WHERE title LIKE ? ESCAPE '\\' ORDER BY isbn",
            BOOK_COLUMNS
        ))
        .bind(like_pattern(term))
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.iter().map(book_from_row).collect::<Result<_, _>>()?)
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = ?, author = ?, short_description = ?, page_count = ?, release_date = ?
            WHERE isbn = ?
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.short_description)
        .bind(book.page_count)
        .bind(book.release_date)
        .bind(&book.isbn)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, isbn: &str) -> AppResult<bool> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
