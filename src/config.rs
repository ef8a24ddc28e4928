// Process configuration from environment variables
//
//   FINANCE_DB_URI     sqlite:///finance_db.sqlite (default)
//   FINANCE_BIND_ADDR  0.0.0.0:5000 (default)
//   FINANCE_LOG_JSON   1/true for JSON log lines

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_DB_URI: &str = "sqlite:///finance_db.sqlite";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported database URI: {0} (expected sqlite:///<path>)")]
    UnsupportedDatabaseUri(String),

    #[error("Invalid bind address {value}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

impl DatabaseLocation {
    /// Parse an SQLAlchemy-style SQLite URI.
    ///
    /// `sqlite:///rel.db` is relative, `sqlite:////abs/x.db` is absolute,
    /// `sqlite://` and `sqlite:///:memory:` are in-memory. A bare path
    /// without scheme is accepted as a file.
    pub fn parse_uri(uri: &str) -> Result<Self, ConfigError> {
        let uri = uri.trim();

        if uri.is_empty() {
            return Err(ConfigError::UnsupportedDatabaseUri(uri.to_string()));
        }

        let Some(rest) = uri.strip_prefix("sqlite://") else {
            if uri.contains("://") {
                return Err(ConfigError::UnsupportedDatabaseUri(uri.to_string()));
            }
            return Ok(DatabaseLocation::File(PathBuf::from(uri)));
        };

        match rest.strip_prefix('/') {
            None if rest.is_empty() => Ok(DatabaseLocation::Memory),
            None => Err(ConfigError::UnsupportedDatabaseUri(uri.to_string())),
            Some(":memory:") | Some("") => Ok(DatabaseLocation::Memory),
            Some(path) => Ok(DatabaseLocation::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
            DatabaseLocation::Memory => write!(f, ":memory:"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseLocation,
    pub bind_addr: SocketAddr,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_uri = lookup("FINANCE_DB_URI").unwrap_or_else(|| DEFAULT_DB_URI.to_string());
        let bind = lookup("FINANCE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let bind_addr = bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                reason: e.to_string(),
            })?;

        let log_json = lookup("FINANCE_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            database: DatabaseLocation::parse_uri(&db_uri)?,
            bind_addr,
            log_json,
        })
    }
}
