//! Book validation rules
//!
//! Field rules are declared on [`BookPayload`] through the `validator` derive;
//! this module holds the rule functions and flattens their report into the
//! ordered list of failures returned to clients.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::models::book::{BookPayload, ValidationFailure, RELEASE_DATE_FORMAT};

pub const INVALID_ISBN_MESSAGE: &str = "Value was not a valid ISBN-13";
pub const DUPLICATE_ISBN_MESSAGE: &str = "A book with this ISBN-13 already exists!";
pub const EMPTY_TITLE_MESSAGE: &str = "'Title' must not be empty.";
pub const EMPTY_AUTHOR_MESSAGE: &str = "'Author' must not be empty.";
pub const INVALID_RELEASE_DATE_MESSAGE: &str = "'Release Date' is not a valid date.";

const ISBN13_DIGITS: usize = 13;

/// Digit groups separated by single hyphens
static ISBN_GROUPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(-[0-9]+)*$").expect("valid ISBN pattern"));

/// Struct field and JSON property of each rule, in reporting order
const RULE_ORDER: [(&str, &str); 5] = [
    ("isbn", "isbn"),
    ("title", "title"),
    ("author", "author"),
    ("page_count", "pageCount"),
    ("release_date", "releaseDate"),
];

/// Check a candidate book. An empty list means the candidate is valid.
pub fn validate(candidate: &BookPayload) -> Vec<ValidationFailure> {
    let Err(errors) = candidate.validate() else {
        return Vec::new();
    };
    let field_errors = errors.field_errors();

    RULE_ORDER
        .iter()
        .filter_map(|(field, property)| field_errors.get(*field).map(|errs| (*property, *errs)))
        .flat_map(|(property, errs)| {
            errs.iter().map(move |err| {
                let message = err.message.as_deref().unwrap_or(err.code.as_ref());
                ValidationFailure::new(property, message)
            })
        })
        .collect()
}

/// Whether `value` has the shape of an ISBN-13
pub fn is_isbn13(value: &str) -> bool {
    ISBN_GROUPS.is_match(value)
        && value.chars().filter(char::is_ascii_digit).count() == ISBN13_DIGITS
}

/// Parse a release date given either as a plain date or as an ISO-8601
/// date-time, in which case the time of day is dropped.
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn isbn13(value: &str) -> Result<(), ValidationError> {
    if is_isbn13(value) {
        Ok(())
    } else {
        Err(failure("isbn13", INVALID_ISBN_MESSAGE))
    }
}

pub(crate) fn title_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("not_empty", EMPTY_TITLE_MESSAGE))
    } else {
        Ok(())
    }
}

pub(crate) fn author_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("not_empty", EMPTY_AUTHOR_MESSAGE))
    } else {
        Ok(())
    }
}

pub(crate) fn release_date(value: &str) -> Result<(), ValidationError> {
    match parse_release_date(value) {
        Some(_) => Ok(()),
        None => Err(failure("date", INVALID_RELEASE_DATE_MESSAGE)),
    }
}
