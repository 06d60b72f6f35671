//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, ValidationFailure},
    AppState,
};

use super::{ApiKey, BookJson};

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = Book,
            headers(("Location" = String, description = "Path of the created book"))),
        (status = 400, description = "Invalid book or duplicate ISBN", body = Vec<ValidationFailure>),
        (status = 401, description = "Missing or invalid API key")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    _: ApiKey,
    BookJson(payload): BookJson<BookPayload>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<Book>)> {
    let book = state.services.catalog.create(payload).await?;
    let location = format!("/books/{}", book.isbn);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

/// List books, optionally filtered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = match query.term() {
        Some(term) => state.services.catalog.search_by_title(term).await?,
        None => state.services.catalog.get_all().await?,
    };
    Ok(Json(books))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN-13")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    state
        .services
        .catalog
        .get_by_isbn(&isbn)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", isbn)))
}

/// Update an existing book.
///
/// The ISBN in the body identifies the book to update.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN-13")),
    request_body = Book,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid book", body = Vec<ValidationFailure>),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    _: ApiKey,
    Path(isbn): Path<String>,
    BookJson(payload): BookJson<BookPayload>,
) -> AppResult<Json<Book>> {
    if payload.isbn != isbn {
        tracing::debug!("Update path isbn={} differs from body isbn={}", isbn, payload.isbn);
    }

    let target = payload.isbn.clone();
    state
        .services
        .catalog
        .update(payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", target)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN-13")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    _: ApiKey,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    if state.services.catalog.delete(&isbn).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Book {} not found", isbn)))
    }
}
