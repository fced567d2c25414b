//! Schema creation for the politician store.
//!
//! # Responsibility
//! - Create tables, constraints and the aggregate trigger if absent.
//! - Turn on foreign-key enforcement for the connection.
//!
//! # Invariants
//! - `ensure_schema` is idempotent and safe on every startup.
//! - Schema version is mirrored to `PRAGMA user_version`; a newer version is
//!   rejected instead of being used.
//! - No table is created unless foreign keys are enforced.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

/// Creates the schema on `conn` if it does not exist yet.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer binary.
/// - `ForeignKeysUnavailable` when the engine refuses foreign-key enforcement.
/// - `Schema` for any statement failure, tagged with the failing stage.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    // Must run outside a transaction; SQLite ignores it inside one.
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|source| DbError::Schema {
            stage: "enable_foreign_keys",
            source,
        })?;
    if !foreign_keys_enabled(conn)? {
        return Err(DbError::ForeignKeysUnavailable);
    }

    let current_version = user_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    let tx = conn.transaction().map_err(|source| DbError::Schema {
        stage: "begin",
        source,
    })?;
    tx.execute_batch(SCHEMA_SQL)
        .map_err(|source| DbError::Schema {
            stage: "create_tables",
            source,
        })?;
    if current_version < SCHEMA_VERSION {
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
            .map_err(|source| DbError::Schema {
                stage: "set_user_version",
                source,
            })?;
    }
    tx.commit().map_err(|source| DbError::Schema {
        stage: "commit",
        source,
    })?;

    Ok(())
}

/// Reads `PRAGMA user_version`.
pub fn user_version(conn: &Connection) -> DbResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(|source| DbError::Schema {
            stage: "read_user_version",
            source,
        })
}

fn foreign_keys_enabled(conn: &Connection) -> DbResult<bool> {
    conn.query_row("PRAGMA foreign_keys;", [], |row| row.get::<_, i64>(0))
        .map(|value| value == 1)
        .map_err(|source| DbError::Schema {
            stage: "verify_foreign_keys",
            source,
        })
}
