// Finance Entry - the single record type managed by the store
//
// Identity: integer id assigned by the persistence layer, never reused
// Values: description, amount, category, date (replaced wholesale on update)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{ValidationError, DATE_FORMAT};

/// Identifier of a stored entry
pub type EntryId = i64;

// ============================================================================
// STORED ENTRY
// ============================================================================

/// A persisted finance entry.
///
/// `amount` is kept as an exact decimal and serialized as a JSON number
/// with every digit and the original scale; `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: EntryId,
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl FinanceEntry {
    /// Raw field view of this entry, used as the base when merging an update
    pub fn to_fields(&self) -> EntryFields {
        EntryFields {
            description: Some(Value::String(self.description.clone())),
            // String form keeps the exact scale through re-validation
            amount: Some(Value::String(self.amount.to_string())),
            category: Some(Value::String(self.category.clone())),
            date: Some(Value::String(self.date.format(DATE_FORMAT).to_string())),
        }
    }
}

// ============================================================================
// VALIDATED ENTRY (no identity yet)
// ============================================================================

/// Business fields that passed validation, waiting for an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl NewEntry {
    pub fn with_id(self, id: EntryId) -> FinanceEntry {
        FinanceEntry {
            id,
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date,
        }
    }
}

// ============================================================================
// RAW INPUT
// ============================================================================

/// Untrusted field set as received from a caller.
///
/// Every field is optional so the same shape serves create (all required)
/// and update (any subset). JSON `null` is treated as absent. Unknown keys
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryFields {
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
}

impl EntryFields {
    /// Parse a request body. Anything other than a JSON object is rejected.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| ValidationError::new("body", "Request body must be JSON"))?;

        if !value.is_object() {
            return Err(ValidationError::new(
                "body",
                "Request body must be a JSON object",
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| ValidationError::new("body", format!("Malformed request body: {e}")))
    }

    /// True when no field is provided
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Override fields of `self` with every field provided in `changes`
    pub fn overlay(mut self, changes: &EntryFields) -> Self {
        if let Some(v) = &changes.description {
            self.description = Some(v.clone());
        }
        if let Some(v) = &changes.amount {
            self.amount = Some(v.clone());
        }
        if let Some(v) = &changes.category {
            self.category = Some(v.clone());
        }
        if let Some(v) = &changes.date {
            self.date = Some(v.clone());
        }
        self
    }
}
