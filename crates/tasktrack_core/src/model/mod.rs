//! Domain model for users, projects and their embedded tasks.
//!
//! # Responsibility
//! - Define the record shapes persisted by the record store.
//! - Own the derived-status rule shared by every project mutation.
//!
//! # Invariants
//! - Identifiers are time-ordered UUIDv7 values, serialized as strings.
//! - Timestamps are Unix epoch milliseconds.
//! - Serialized field names are camelCase.

pub mod project;
pub mod update;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Allocates a new identifier.
///
/// UUIDv7 keeps ids unique and ordered by allocation time within a process.
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Falls back to `0` when the system clock is before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{new_id, now_epoch_ms};

    #[test]
    fn new_ids_are_unique_and_ordered() {
        let ids = (0..64).map(|_| new_id()).collect::<Vec<_>>();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_epoch_ms() > 1_577_836_800_000);
    }
}
