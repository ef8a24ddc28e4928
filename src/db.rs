// SQLite persistence for finance entries (rusqlite)
//
// Amounts are stored as decimal TEXT so the exact scale survives a round
// trip. AUTOINCREMENT keeps deleted ids from ever being reused.

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::config::DatabaseLocation;
use crate::entry::{EntryId, FinanceEntry, NewEntry};
use crate::error::PersistenceError;
use crate::store::EntryRepository;
use crate::validation::DATE_FORMAT;

pub fn setup_database(conn: &Connection) -> Result<(), PersistenceError> {
    // Enable WAL mode for crash recovery (in-memory databases report "memory")
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;

    // ==========================================================================
    // Entries Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS finance_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_date ON finance_entries(date)",
        [],
    )?;

    Ok(())
}

/// Row exactly as stored, before amount/date are parsed back
struct StoredRow {
    id: EntryId,
    description: String,
    amount: String,
    category: String,
    date: String,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(StoredRow {
            id: row.get(0)?,
            description: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            date: row.get(4)?,
        })
    }

    fn into_entry(self) -> Result<FinanceEntry, PersistenceError> {
        let amount = Decimal::from_str(&self.amount).map_err(|e| PersistenceError::CorruptRow {
            id: self.id,
            reason: format!("amount {:?}: {e}", self.amount),
        })?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            PersistenceError::CorruptRow {
                id: self.id,
                reason: format!("date {:?}: {e}", self.date),
            }
        })?;

        Ok(FinanceEntry {
            id: self.id,
            description: self.description,
            amount,
            category: self.category,
            date,
        })
    }
}

/// rusqlite-backed EntryRepository
pub struct SqliteEntryRepository {
    conn: Connection,
}

impl SqliteEntryRepository {
    /// Wrap an open connection, creating the schema if needed
    pub fn new(conn: Connection) -> Result<Self, PersistenceError> {
        setup_database(&conn)?;
        Ok(SqliteEntryRepository { conn })
    }

    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        Self::new(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn open_location(location: &DatabaseLocation) -> Result<Self, PersistenceError> {
        match location {
            DatabaseLocation::File(path) => Self::open(path),
            DatabaseLocation::Memory => Self::open_in_memory(),
        }
    }

    pub fn count(&self) -> Result<i64, PersistenceError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM finance_entries", [], |row| row.get(0))?;

        Ok(count)
    }
}

impl EntryRepository for SqliteEntryRepository {
    fn insert(&mut self, entry: NewEntry) -> Result<FinanceEntry, PersistenceError> {
        self.conn.execute(
            "INSERT INTO finance_entries (description, amount, category, date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.description,
                entry.amount.to_string(),
                entry.category,
                entry.date.format(DATE_FORMAT).to_string(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(entry.with_id(id))
    }

    fn find_all(&self) -> Result<Vec<FinanceEntry>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, amount, category, date
             FROM finance_entries
             ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRow::into_entry).collect()
    }

    fn find_by_id(&self, id: EntryId) -> Result<Option<FinanceEntry>, PersistenceError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, description, amount, category, date
                 FROM finance_entries
                 WHERE id = ?1",
                params![id],
                StoredRow::from_row,
            )
            .optional()?;

        row.map(StoredRow::into_entry).transpose()
    }

    fn update(&mut self, entry: &FinanceEntry) -> Result<bool, PersistenceError> {
        let changed = self.conn.execute(
            "UPDATE finance_entries
             SET description = ?1, amount = ?2, category = ?3, date = ?4
             WHERE id = ?5",
            params![
                entry.description,
                entry.amount.to_string(),
                entry.category,
                entry.date.format(DATE_FORMAT).to_string(),
                entry.id,
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete(&mut self, id: EntryId) -> Result<bool, PersistenceError> {
        let changed = self
            .conn
            .execute("DELETE FROM finance_entries WHERE id = ?1", params![id])?;

        Ok(changed > 0)
    }
}
