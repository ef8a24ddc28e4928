// Error taxonomy for the entry store
//
// Validation and NotFound are caller mistakes; Persistence is a storage
// collaborator failure and is never retried here.

use thiserror::Error;

use crate::entry::EntryId;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Corrupt row for entry {id}: {reason}")]
    CorruptRow { id: EntryId, reason: String },

    #[error("Storage lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Entry {0} not found")]
    NotFound(EntryId),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Running total of {count} entries exceeds the decimal range")]
    TotalOverflow { count: usize },
}

pub type Result<T> = std::result::Result<T, StoreError>;
