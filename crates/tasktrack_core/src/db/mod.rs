//! Record database bootstrap.
//!
//! The database holds a single `records` table: one JSON document per key
//! (`users`, `projects`, `currentUser`). Everything above this module sees it
//! only through `RecordStore`.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the last applied migration.
//! - A connection is handed out only after migrations succeed, so the
//!   `records` table always exists for callers.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a build with more migrations than this one knows.
    SchemaTooNew { found: u32, latest: u32 },
}

impl DbError {
    /// Stable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite",
            Self::SchemaTooNew { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "record database error: {err}"),
            Self::SchemaTooNew { found, latest } => write!(
                f,
                "record database is at migration {found}, this build stops at {latest}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
