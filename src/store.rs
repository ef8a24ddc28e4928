// Entry Record Store - validation + CRUD orchestration
//
// The store owns no records itself. Durable storage is delegated to an
// EntryRepository injected at construction.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::entry::{EntryFields, EntryId, FinanceEntry, NewEntry};
use crate::error::{PersistenceError, Result, StoreError};
use crate::validation::validate_entry;

// ============================================================================
// PERSISTENCE COLLABORATOR
// ============================================================================

/// Narrow storage interface for finance entries.
///
/// Implementations assign ids on `insert` and must never hand out an id
/// twice, even after the entry holding it is deleted. `find_all` returns
/// entries in insertion order.
pub trait EntryRepository {
    fn insert(&mut self, entry: NewEntry) -> std::result::Result<FinanceEntry, PersistenceError>;

    fn find_all(&self) -> std::result::Result<Vec<FinanceEntry>, PersistenceError>;

    fn find_by_id(&self, id: EntryId) -> std::result::Result<Option<FinanceEntry>, PersistenceError>;

    /// Returns false when no entry with `entry.id` exists
    fn update(&mut self, entry: &FinanceEntry) -> std::result::Result<bool, PersistenceError>;

    /// Returns false when no entry with `id` exists
    fn delete(&mut self, id: EntryId) -> std::result::Result<bool, PersistenceError>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for Box<R> {
    fn insert(&mut self, entry: NewEntry) -> std::result::Result<FinanceEntry, PersistenceError> {
        (**self).insert(entry)
    }

    fn find_all(&self) -> std::result::Result<Vec<FinanceEntry>, PersistenceError> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: EntryId) -> std::result::Result<Option<FinanceEntry>, PersistenceError> {
        (**self).find_by_id(id)
    }

    fn update(&mut self, entry: &FinanceEntry) -> std::result::Result<bool, PersistenceError> {
        (**self).update(entry)
    }

    fn delete(&mut self, id: EntryId) -> std::result::Result<bool, PersistenceError> {
        (**self).delete(id)
    }
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

/// Liveness payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Liveness only; never touches storage
pub fn health() -> HealthStatus {
    HealthStatus { status: "ok" }
}

/// Entry count and the sum of all amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub running_total: Decimal,
}

// ============================================================================
// STORE
// ============================================================================

pub struct EntryStore<R> {
    repo: R,
}

impl<R: EntryRepository> EntryStore<R> {
    pub fn new(repo: R) -> Self {
        EntryStore { repo }
    }

    /// All entries in insertion order
    pub fn list(&self) -> Result<Vec<FinanceEntry>> {
        Ok(self.repo.find_all()?)
    }

    pub fn get(&self, id: EntryId) -> Result<FinanceEntry> {
        self.repo.find_by_id(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Validate `fields`, assign an id and persist.
    /// Nothing is written when validation fails.
    pub fn create(&mut self, fields: &EntryFields) -> Result<FinanceEntry> {
        let new_entry = validate_entry(fields).inspect_err(|err| {
            warn!(field = %err.field, "rejected new entry: {}", err.message);
        })?;

        let entry = self.repo.insert(new_entry)?;
        info!(id = entry.id, category = %entry.category, "created entry");

        Ok(entry)
    }

    /// Merge `changes` over the stored entry and persist the result.
    ///
    /// The merged record goes through the same validation as `create`, so a
    /// partial update can never leave an invalid entry behind. An empty
    /// change set returns the stored entry untouched.
    pub fn update(&mut self, id: EntryId, changes: &EntryFields) -> Result<FinanceEntry> {
        let existing = self.get(id).inspect_err(|_| {
            warn!(id, "update of unknown entry");
        })?;

        if changes.is_empty() {
            debug!(id, "empty change set");
            return Ok(existing);
        }

        let merged = existing.to_fields().overlay(changes);
        let updated = validate_entry(&merged)
            .inspect_err(|err| {
                warn!(id, field = %err.field, "rejected entry update: {}", err.message);
            })?
            .with_id(id);

        // Row can vanish between the lookup and the write
        if !self.repo.update(&updated)? {
            return Err(StoreError::NotFound(id));
        }
        info!(id, "updated entry");

        Ok(updated)
    }

    /// Hard delete
    pub fn delete(&mut self, id: EntryId) -> Result<()> {
        if !self.repo.delete(id)? {
            warn!(id, "delete of unknown entry");
            return Err(StoreError::NotFound(id));
        }
        info!(id, "deleted entry");

        Ok(())
    }

    /// Count and exact sum of all amounts. Each amount is individually
    /// valid, but their sum can still leave the decimal range.
    pub fn summary(&self) -> Result<EntrySummary> {
        let entries = self.repo.find_all()?;
        let count = entries.len();

        let running_total = entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
            .ok_or_else(|| {
                warn!(count, "running total overflowed");
                StoreError::TotalOverflow { count }
            })?;

        Ok(EntrySummary {
            count,
            running_total,
        })
    }
}
