// Finance Tracker - Core Library
// Exposes the entry store for the API server and tests

pub mod config;
pub mod db;
pub mod entry;
pub mod error;
pub mod logging;
pub mod memory;
pub mod store;
pub mod validation;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{Config, ConfigError, DatabaseLocation};
pub use db::{setup_database, SqliteEntryRepository};
pub use entry::{EntryFields, EntryId, FinanceEntry, NewEntry};
pub use error::{PersistenceError, StoreError};
pub use memory::InMemoryEntryRepository;
pub use store::{health, EntryRepository, EntryStore, EntrySummary, HealthStatus};
pub use validation::{validate_entry, ValidationError, DATE_FORMAT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
