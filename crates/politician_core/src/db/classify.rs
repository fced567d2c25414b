//! SQLite failure classification.
//!
//! # Responsibility
//! - Translate engine result codes into [`RecordError`] under the context of
//!   the statement that produced them.
//! - Keep the code-to-meaning table in one place.
//!
//! # Invariants
//! - Called only for non-success outcomes; success paths never build errors.
//! - Unknown codes are never dropped: they become `StorageFault` with the raw
//!   code and engine message attached.

use crate::error::RecordError;
use rusqlite::ffi;
use std::fmt::{Display, Formatter};

/// Logical operation a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InsertPolitician,
    InsertRating,
    UpdateParty,
    DeletePolitician,
    Search,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InsertPolitician => "insert_politician",
            Self::InsertRating => "insert_rating",
            Self::UpdateParty => "update_party",
            Self::DeletePolitician => "delete_politician",
            Self::Search => "search",
        }
    }
}

/// Statement lifecycle stage where a failure surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prepare,
    Bind,
    Step,
    Read,
    Finalize,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Bind => "bind",
            Self::Step => "step",
            Self::Read => "read",
            Self::Finalize => "finalize",
        }
    }
}

/// Where in which operation a statement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementContext {
    pub operation: Operation,
    pub stage: Stage,
    /// 1-based parameter index for bind failures.
    pub bind_index: Option<usize>,
}

impl StatementContext {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            stage: Stage::Prepare,
            bind_index: None,
        }
    }

    pub fn at(self, stage: Stage) -> Self {
        Self {
            stage,
            bind_index: None,
            ..self
        }
    }

    pub fn binding(self, index: usize) -> Self {
        Self {
            stage: Stage::Bind,
            bind_index: Some(index),
            ..self
        }
    }
}

impl Display for StatementContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in `{}`", self.stage.as_str(), self.operation.as_str())?;
        if let Some(index) = self.bind_index {
            write!(f, " (parameter {index})")?;
        }
        Ok(())
    }
}

/// Classifies a `rusqlite` error raised while running a statement.
pub fn classify(context: StatementContext, err: rusqlite::Error) -> RecordError {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            let message = message.unwrap_or_else(|| failure.to_string());
            classify_code(context, failure.extended_code, message)
        }
        other => RecordError::StorageFault {
            context,
            code: None,
            extended_code: None,
            message: other.to_string(),
        },
    }
}

/// Classifies a raw SQLite extended result code.
pub fn classify_code(
    context: StatementContext,
    extended_code: i32,
    message: impl Into<String>,
) -> RecordError {
    match (context.operation, extended_code) {
        (Operation::InsertPolitician | Operation::UpdateParty, ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
            RecordError::DuplicateIdentity
        }
        (Operation::InsertRating, ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => {
            RecordError::DuplicateRating
        }
        (Operation::InsertPolitician | Operation::InsertRating, ffi::SQLITE_CONSTRAINT_NOTNULL) => {
            RecordError::MissingRequiredField
        }
        (Operation::InsertRating, ffi::SQLITE_CONSTRAINT_CHECK) => RecordError::OutOfRangePoints,
        (Operation::InsertRating, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => RecordError::OrphanRating,
        _ => RecordError::StorageFault {
            context,
            code: Some(extended_code & 0xff),
            extended_code: Some(extended_code),
            message: message.into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, classify_code, Operation, Stage, StatementContext};
    use crate::error::RecordError;
    use rusqlite::ffi;

    fn step(operation: Operation) -> StatementContext {
        StatementContext::new(operation).at(Stage::Step)
    }

    #[test]
    fn primary_key_meaning_depends_on_operation() {
        assert!(matches!(
            classify_code(step(Operation::InsertPolitician), ffi::SQLITE_CONSTRAINT_PRIMARYKEY, ""),
            RecordError::DuplicateIdentity
        ));
        assert!(matches!(
            classify_code(step(Operation::UpdateParty), ffi::SQLITE_CONSTRAINT_PRIMARYKEY, ""),
            RecordError::DuplicateIdentity
        ));
        assert!(matches!(
            classify_code(step(Operation::InsertRating), ffi::SQLITE_CONSTRAINT_PRIMARYKEY, ""),
            RecordError::DuplicateRating
        ));
    }

    #[test]
    fn rating_constraints_map_to_rating_variants() {
        let ctx = step(Operation::InsertRating);
        assert!(matches!(
            classify_code(ctx, ffi::SQLITE_CONSTRAINT_CHECK, ""),
            RecordError::OutOfRangePoints
        ));
        assert!(matches!(
            classify_code(ctx, ffi::SQLITE_CONSTRAINT_FOREIGNKEY, ""),
            RecordError::OrphanRating
        ));
        assert!(matches!(
            classify_code(ctx, ffi::SQLITE_CONSTRAINT_NOTNULL, ""),
            RecordError::MissingRequiredField
        ));
    }

    #[test]
    fn unexpected_codes_become_storage_faults_with_raw_details() {
        let ctx = step(Operation::Search);
        let err = classify_code(ctx, ffi::SQLITE_IOERR_READ, "disk I/O error");
        match err {
            RecordError::StorageFault {
                context,
                code,
                extended_code,
                message,
            } => {
                assert_eq!(context, ctx);
                assert_eq!(code, Some(ffi::SQLITE_IOERR));
                assert_eq!(extended_code, Some(ffi::SQLITE_IOERR_READ));
                assert_eq!(message, "disk I/O error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn check_violation_outside_rating_insert_is_a_fault() {
        let err = classify_code(step(Operation::DeletePolitician), ffi::SQLITE_CONSTRAINT_CHECK, "x");
        assert!(matches!(err, RecordError::StorageFault { .. }));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn non_sqlite_errors_are_faults_without_code() {
        let ctx = StatementContext::new(Operation::Search).at(Stage::Read);
        let err = classify(ctx, rusqlite::Error::InvalidColumnIndex(9));
        assert!(matches!(
            err,
            RecordError::StorageFault {
                code: None,
                extended_code: None,
                ..
            }
        ));
    }

    #[test]
    fn context_display_names_stage_and_parameter() {
        let ctx = StatementContext::new(Operation::InsertRating).binding(3);
        assert_eq!(ctx.to_string(), "bind in `insert_rating` (parameter 3)");
    }
}
