//! Book model and related request/response types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::validation;

/// Date format used on the wire and in the store
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Catalog record, keyed by its ISBN-13
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// ISBN-13, digits optionally grouped with hyphens
    #[schema(example = "978-0-13-468599-1")]
    pub isbn: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub short_description: String,
    pub page_count: i64,
    #[schema(value_type = String, format = Date, example = "2019-09-13")]
    pub release_date: NaiveDate,
}

/// Unvalidated book as received in a request body.
///
/// Every field is optional on the wire so that a missing field is reported as a
/// validation failure instead of a body decoding error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    #[validate(custom(function = "validation::isbn13"))]
    pub isbn: String,
    #[validate(custom(function = "validation::title_present"))]
    pub title: String,
    #[validate(custom(function = "validation::author_present"))]
    pub author: String,
    pub short_description: String,
    #[validate(range(min = 0, message = "'Page Count' must be greater than or equal to '0'."))]
    pub page_count: i64,
    #[validate(custom(function = "validation::release_date"))]
    pub release_date: String,
}

impl From<Book> for BookPayload {
    fn from(book: Book) -> Self {
        Self {
            isbn: book.isbn,
            title: book.title,
            author: book.author,
            short_description: book.short_description,
            page_count: book.page_count,
            release_date: book.release_date.format(RELEASE_DATE_FORMAT).to_string(),
        }
    }
}

impl TryFrom<BookPayload> for Book {
    type Error = Vec<ValidationFailure>;

    /// Accepts the payload only if it passes every validation rule
    fn try_from(payload: BookPayload) -> Result<Self, Self::Error> {
        let failures = validation::validate(&payload);
        if !failures.is_empty() {
            return Err(failures);
        }

        let release_date = validation::parse_release_date(&payload.release_date).ok_or_else(|| {
            vec![ValidationFailure::new(
                "releaseDate",
                validation::INVALID_RELEASE_DATE_MESSAGE,
            )]
        })?;

        Ok(Self {
            isbn: payload.isbn,
            title: payload.title,
            author: payload.author,
            short_description: payload.short_description,
            page_count: payload.page_count,
            release_date,
        })
    }
}

/// A field-scoped rejection of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Name of the offending JSON property
    pub property_name: String,
    pub error_message: String,
}

impl ValidationFailure {
    pub fn new(property_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            error_message: error_message.into(),
        }
    }
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the title; blank or absent lists every book
    pub search_term: Option<String>,
}

impl BookQuery {
    /// Search term, if one was given and is not blank
    pub fn term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .filter(|term| !term.trim().is_empty())
    }
}
