//! Key-value record store.
//!
//! # Responsibility
//! - Persist whole collections as JSON text under a fixed key.
//! - Keep the durable medium behind a small get/set/remove contract.
//!
//! # Invariants
//! - Reads fail open: absent keys, backend errors and corrupt JSON all yield
//!   an empty collection (or no record).
//! - Writes fail closed: every serialization or backend failure is returned.
//! - A single key write is atomic; nothing spans multiple keys.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite_store;

pub use sqlite_store::SqliteRecordStore;

/// Key holding the ordered user collection.
pub const USERS_KEY: &str = "users";
/// Key holding the ordered project collection (tasks embedded).
pub const PROJECTS_KEY: &str = "projects";
/// Key holding the single current-user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage failure.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Serialize {
        key: String,
        source: serde_json::Error,
    },
    /// Store was opened on a connection without the `records` table.
    MissingSchema,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "storage failure: {err}"),
            Self::Serialize { key, source } => {
                write!(f, "storage failure: cannot serialize `{key}`: {source}")
            }
            Self::MissingSchema => write!(f, "storage failure: records table is missing"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialize { source, .. } => Some(source),
            Self::MissingSchema => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Durable get/set-by-key medium.
pub trait RecordStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

/// Reads a collection, degrading every failure to an empty `Vec`.
pub fn read_collection<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    read_record::<Vec<T>, S>(store, key).unwrap_or_default()
}

/// Serializes and writes a whole collection under `key`.
pub fn write_collection<T, S>(store: &S, key: &str, records: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: RecordStore + ?Sized,
{
    let text = serde_json::to_string(records).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &text)
}

/// Reads one record, degrading every failure to `None`.
pub fn read_record<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let text = match store.get_item(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            warn!("event=store_read module=store status=error key={key} error={err}");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(
                "event=store_read module=store status=error key={key} error_code=corrupt_record error={err}"
            );
            None
        }
    }
}

/// Writes one record, or removes the key when `record` is `None`.
pub fn write_record<T, S>(store: &S, key: &str, record: Option<&T>) -> StoreResult<()>
where
    T: Serialize,
    S: RecordStore + ?Sized,
{
    match record {
        Some(record) => {
            let text = serde_json::to_string(record).map_err(|source| StoreError::Serialize {
                key: key.to_string(),
                source,
            })?;
            store.set_item(key, &text)
        }
        None => store.remove_item(key),
    }
}
