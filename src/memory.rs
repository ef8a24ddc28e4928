use std::collections::BTreeMap;

use crate::entry::{EntryId, FinanceEntry, NewEntry};
use crate::error::PersistenceError;
use crate::store::EntryRepository;

/// In-memory entry repository.
///
/// Intended for tests/dev. Ids come from a monotonic counter so a deleted
/// id is never handed out again; the BTreeMap keeps insertion order.
#[derive(Debug)]
pub struct InMemoryEntryRepository {
    entries: BTreeMap<EntryId, FinanceEntry>,
    next_id: EntryId,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryRepository for InMemoryEntryRepository {
    fn insert(&mut self, entry: NewEntry) -> Result<FinanceEntry, PersistenceError> {
        let id = self.next_id;
        self.next_id += 1;

        let stored = entry.with_id(id);
        self.entries.insert(id, stored.clone());
        Ok(stored)
    }

    fn find_all(&self) -> Result<Vec<FinanceEntry>, PersistenceError> {
        Ok(self.entries.values().cloned().collect())
    }

    fn find_by_id(&self, id: EntryId) -> Result<Option<FinanceEntry>, PersistenceError> {
        Ok(self.entries.get(&id).cloned())
    }

    fn update(&mut self, entry: &FinanceEntry) -> Result<bool, PersistenceError> {
        match self.entries.get_mut(&entry.id) {
            Some(slot) => {
                *slot = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, id: EntryId) -> Result<bool, PersistenceError> {
        Ok(self.entries.remove(&id).is_some())
    }
}
