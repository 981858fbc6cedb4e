//! Schema steps for the key-value database.
//!
//! # Invariants
//! - Step `n` (1-based) brings the schema to version `n`.
//! - The reached version is recorded in `PRAGMA user_version`.
//! - Pending steps and the version bump commit together or not at all.

use crate::storage::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Ordered schema steps; append only.
const SCHEMA_STEPS: &[&str] = &[include_str!("0001_init.sql")];

/// Returns the schema version this build writes.
pub const fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database was written by a newer build.
/// - `Sqlite` when a step fails; the database keeps its previous version.
pub fn apply_migrations(conn: &mut Connection) -> StorageResult<()> {
    let current = schema_version(conn)?;
    let latest = latest_version();

    let pending = match current.cmp(&latest) {
        Ordering::Equal => return Ok(()),
        Ordering::Greater => {
            return Err(StorageError::UnsupportedSchemaVersion {
                db_version: current,
                latest_supported: latest,
            })
        }
        Ordering::Less => &SCHEMA_STEPS[current as usize..],
    };

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step)?;
    }
    tx.pragma_update(None, "user_version", latest)?;
    tx.commit()?;

    info!("event=schema_migrate module=storage status=ok from={current} to={latest}");
    Ok(())
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, schema_version};
    use rusqlite::Connection;

    #[test]
    fn fresh_database_reaches_latest_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), latest_version());
    }
}
