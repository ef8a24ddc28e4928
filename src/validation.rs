// 📐 Entry Schema Validation
//
// Turns an untrusted EntryFields into a well-typed NewEntry.
// Fields are checked in order description, amount, category, date and the
// first failure is returned (fail fast).

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use crate::entry::{EntryFields, NewEntry};

/// Fixed calendar date format accepted and produced by the store
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column limits of the entries table
pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_CATEGORY_LEN: usize = 64;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// The first offending field and what is wrong with it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validate a complete field set
pub fn validate_entry(fields: &EntryFields) -> Result<NewEntry, ValidationError> {
    let description = parse_text(
        "description",
        fields.description.as_ref(),
        MAX_DESCRIPTION_LEN,
    )?;
    let amount = parse_amount(fields.amount.as_ref())?;
    let category = parse_text("category", fields.category.as_ref(), MAX_CATEGORY_LEN)?;
    let date = parse_date(fields.date.as_ref())?;

    Ok(NewEntry {
        description,
        amount,
        category,
        date,
    })
}

fn require<'a>(field: &str, value: Option<&'a Value>) -> Result<&'a Value, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, "Missing required field"))
}

/// Non-empty trimmed text no longer than `max_len` characters
pub fn parse_text(
    field: &str,
    value: Option<&Value>,
    max_len: usize,
) -> Result<String, ValidationError> {
    let text = match require(field, value)? {
        Value::String(s) => s.trim(),
        _ => return Err(ValidationError::new(field, "Must be a string")),
    };

    if text.is_empty() {
        return Err(ValidationError::new(field, "Cannot be empty"));
    }

    if text.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("Must be at most {max_len} characters"),
        ));
    }

    Ok(text.to_string())
}

/// Exact decimal from a JSON number or a numeric string
pub fn parse_amount(value: Option<&Value>) -> Result<Decimal, ValidationError> {
    let raw = match require("amount", value)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(ValidationError::new("amount", "Amount must be a valid number")),
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ValidationError::new("amount", "Amount must be a valid number"))
}

/// Calendar date in `YYYY-MM-DD` form
pub fn parse_date(value: Option<&Value>) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::new("date", "Invalid date format (use YYYY-MM-DD)");

    match require("date", value)? {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
