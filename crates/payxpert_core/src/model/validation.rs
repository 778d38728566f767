//! Input validation errors and shared parsers.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Date format accepted from operators and persisted in the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation failure for caller-provided input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("invalid email address: `{0}`")]
    InvalidEmail(String),
    #[error("invalid phone number: `{0}`")]
    InvalidPhone(String),
    #[error("invalid {field}: `{value}` (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} {value} is outside years 1000 to 9999")]
    DateOutOfRange { field: &'static str, value: NaiveDate },
    #[error("{later} ({later_value}) must not be before {earlier} ({earlier_value})")]
    DateOrder {
        earlier: &'static str,
        earlier_value: NaiveDate,
        later: &'static str,
        later_value: NaiveDate,
    },
    #[error("invalid amount: `{0}`")]
    InvalidAmount(String),
    #[error("period start {start} is after period end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("invalid tax year {0}: expected a 4-digit year")]
    InvalidTaxYear(i32),
}

/// Parses a `YYYY-MM-DD` date with a 4-digit year, naming `field` on failure.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        }
    })?;
    validate_date_range(field, date)?;
    Ok(date)
}

/// Ensures `date` has a 4-digit year.
///
/// Dates are stored as `YYYY-MM-DD` text and compared as text, which only
/// orders correctly for years 1000 through 9999.
pub fn validate_date_range(field: &'static str, date: NaiveDate) -> Result<(), ValidationError> {
    if !(1000..=9999).contains(&date.year()) {
        return Err(ValidationError::DateOutOfRange { field, value: date });
    }
    Ok(())
}

/// Parses an optional date: blank input means "not set".
pub fn parse_optional_date(
    field: &'static str,
    value: &str,
) -> Result<Option<NaiveDate>, ValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, value).map(Some)
}

/// Parses a signed decimal amount such as `-12.50`.
///
/// Exponents, `NaN` and infinities are rejected.
pub fn parse_amount(value: &str) -> Result<Decimal, ValidationError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed).map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))
}

/// Ensures `[start, end]` is a closed, non-negative range.
pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    validate_date_range("period start", start)?;
    validate_date_range("period end", end)?;
    if start > end {
        return Err(ValidationError::InvalidPeriod { start, end });
    }
    Ok(())
}

/// Ensures `year` is a 4-digit calendar year.
pub fn validate_tax_year(year: i32) -> Result<(), ValidationError> {
    if !(1000..=9999).contains(&year) {
        return Err(ValidationError::InvalidTaxYear(year));
    }
    Ok(())
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
