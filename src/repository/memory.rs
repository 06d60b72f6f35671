//! In-process book storage, for tests and local experiments

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

/// Books kept in a map ordered by ISBN
#[derive(Default)]
pub struct InMemoryBookStore {
    books: RwLock<BTreeMap<String, Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn insert(&self, book: &Book) -> AppResult<()> {
        let mut books = self.books.write().await;
        if books.contains_key(&book.isbn) {
            return Err(AppError::Constraint(format!(
                "Book {} already exists",
                book.isbn
            )));
        }
        books.insert(book.isbn.clone(), book.clone());
        Ok(())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.values().cloned().collect())
    }

    async fn find_by_title_substring(&self, term: &str) -> AppResult<Vec<Book>> {
        let needle = term.to_ascii_lowercase();
        Ok(self
            .books
            .read()
            .await
            .values()
            .filter(|book| book.title.to_ascii_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn update(&self, book: &Book) -> AppResult<bool> {
        match self.books.write().await.get_mut(&book.isbn) {
            Some(existing) => {
                *existing = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, isbn: &str) -> AppResult<bool> {
        Ok(self.books.write().await.remove(isbn).is_some())
    }
}
