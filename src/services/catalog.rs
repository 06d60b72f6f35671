//! Book catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload},
    repository::BookStore,
    validation::DUPLICATE_ISBN_MESSAGE,
};

fn duplicate_isbn() -> AppError {
    AppError::invalid("isbn", DUPLICATE_ISBN_MESSAGE)
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a book after validation and ISBN deduplication.
    ///
    /// The existence check is only a fast path: two concurrent creates can both
    /// pass it, and the loser is caught by the store's key constraint on insert.
    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let book = Book::try_from(payload).map_err(AppError::Validation)?;

        if self.store.find_by_isbn(&book.isbn).await?.is_some() {
            return Err(duplicate_isbn());
        }

        match self.store.insert(&book).await {
            Ok(()) => {
                tracing::info!("Catalog create: added book isbn={}", book.isbn);
                Ok(book)
            }
            Err(AppError::Constraint(msg)) => {
                tracing::warn!("Catalog create: lost insert race for isbn={}: {}", book.isbn, msg);
                Err(duplicate_isbn())
            }
            Err(e) => Err(e),
        }
    }

    /// Get a book by ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        tracing::debug!("Catalog lookup isbn={}", isbn);
        self.store.find_by_isbn(isbn).await
    }

    /// List every book
    pub async fn get_all(&self) -> AppResult<Vec<Book>> {
        self.store.find_all().await
    }

    /// Books whose title contains `term`, ignoring case
    pub async fn search_by_title(&self, term: &str) -> AppResult<Vec<Book>> {
        tracing::debug!("Catalog title search term={:?}", term);
        self.store.find_by_title_substring(term).await
    }

    /// Replace every field but the ISBN of an existing book.
    /// The payload's ISBN identifies the book; `None` means it does not exist.
    pub async fn update(&self, payload: BookPayload) -> AppResult<Option<Book>> {
        let book = Book::try_from(payload).map_err(AppError::Validation)?;

        if self.store.find_by_isbn(&book.isbn).await?.is_none() {
            return Ok(None);
        }

        if !self.store.update(&book).await? {
            // Deleted between the lookup and the write
            return Ok(None);
        }

        tracing::info!("Catalog update: updated book isbn={}", book.isbn);
        Ok(Some(book))
    }

    /// Delete a book. Returns false when no such book exists.
    pub async fn delete(&self, isbn: &str) -> AppResult<bool> {
        let deleted = self.store.delete(isbn).await?;
        if deleted {
            tracing::info!("Catalog delete: removed book isbn={}", isbn);
        }
        Ok(deleted)
    }
}
