//! SQLite storage bootstrap, statement execution and error classification.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the politician store.
//! - Create the schema before any application data is touched.
//! - Own the prepared-statement lifecycle and failure classification.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and the schema in place.
//! - Schema version is tracked via `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod classify;
pub mod executor;
mod open;
pub mod schema;

pub use open::{close_db, open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Connection bootstrap failure. Always fatal to startup.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Schema {
        stage: &'static str,
        source: rusqlite::Error,
    },
    ForeignKeysUnavailable,
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Schema { stage, source } => {
                write!(f, "schema setup failed at `{stage}`: {source}")
            }
            Self::ForeignKeysUnavailable => {
                write!(f, "SQLite refused to enable foreign-key enforcement")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Schema { source, .. } => Some(source),
            Self::ForeignKeysUnavailable | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
