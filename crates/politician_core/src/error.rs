//! Domain error taxonomy for record store operations.
//!
//! # Responsibility
//! - Name every failure a caller can observe from the record store.
//! - Separate recoverable constraint violations from storage faults.
//!
//! # Invariants
//! - Constraint variants are produced only by `db::classify`.
//! - `StorageFault` always carries the raw engine code and message when the
//!   failure came from SQLite.

use crate::db::classify::StatementContext;
use crate::model::identity::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecordResult<T> = Result<T, RecordError>;

/// Classified failure of a record store operation.
#[derive(Debug)]
pub enum RecordError {
    /// Caller input rejected before storage was touched.
    Validation(ValidationError),
    /// A politician with the same normalized identity already exists.
    DuplicateIdentity,
    /// A rating with the same identity and timestamp already exists.
    DuplicateRating,
    /// A mandatory column was bound to `NULL`.
    MissingRequiredField,
    /// Rating points outside `[-5, 5]`.
    OutOfRangePoints,
    /// Rating references a politician that does not exist.
    OrphanRating,
    /// Any other engine failure (I/O, misuse, corruption, decoding).
    StorageFault {
        context: StatementContext,
        code: Option<i32>,
        extended_code: Option<i32>,
        message: String,
    },
}

impl RecordError {
    /// Returns true for violations the caller can recover from by changing
    /// input; the store is left unchanged by those.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentity
                | Self::DuplicateRating
                | Self::MissingRequiredField
                | Self::OutOfRangePoints
                | Self::OrphanRating
        )
    }

    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateIdentity => "duplicate_identity",
            Self::DuplicateRating => "duplicate_rating",
            Self::MissingRequiredField => "missing_required_field",
            Self::OutOfRangePoints => "out_of_range_points",
            Self::OrphanRating => "orphan_rating",
            Self::StorageFault { .. } => "storage_fault",
        }
    }
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateIdentity => write!(f, "Politician already exists in the database."),
            Self::DuplicateRating => write!(f, "Rating already exists in the database."),
            Self::MissingRequiredField => write!(f, "Required field omitted."),
            Self::OutOfRangePoints => write!(f, "Rating points must be between -5 and 5."),
            Self::OrphanRating => write!(f, "Politician does not exist in the database."),
            Self::StorageFault {
                context,
                extended_code,
                message,
                ..
            } => {
                write!(f, "{context} failed")?;
                if let Some(code) = extended_code {
                    write!(f, ". Return code: {code}")?;
                }
                if !message.is_empty() {
                    write!(f, "\nDescription: {message}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RecordError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
