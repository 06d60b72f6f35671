#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use library_api::{
    config::DatabaseConfig,
    models::{Book, BookPayload},
    repository::{self, BookStore, BooksRepository, InMemoryBookStore},
};

pub fn dirty_coder() -> Book {
    Book {
        isbn: "978-0-13-235088-4".to_string(),
        title: "The Dirty Coder".to_string(),
        author: "Nick Chapsas".to_string(),
        short_description: "All my tricks in one book".to_string(),
        page_count: 420,
        release_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
    }
}

pub fn book(isbn: &str, title: &str) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: title.to_string(),
        ..dirty_coder()
    }
}

pub fn payload(book: &Book) -> BookPayload {
    BookPayload::from(book.clone())
}

pub fn memory_store() -> Arc<dyn BookStore> {
    Arc::new(InMemoryBookStore::new())
}

/// Fresh SQLite database living in a single in-memory connection
pub async fn sqlite_store() -> Arc<dyn BookStore> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let pool = repository::connect(&config)
        .await
        .expect("Failed to open in-memory database");
    repository::init_schema(&pool)
        .await
        .expect("Failed to create schema");
    Arc::new(BooksRepository::new(pool))
}
