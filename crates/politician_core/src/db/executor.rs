//! Prepared statement lifecycle.
//!
//! # Responsibility
//! - Run one parameterized statement: prepare, bind, step, finalize.
//! - Expose row-returning statements as a lazy, single-pass sequence.
//!
//! # Invariants
//! - A prepared statement never outlives the executor call that created it.
//!   Success paths finalize explicitly; every error path drops the statement,
//!   which finalizes it.
//! - Every failure is routed through `db::classify` before it leaves here.

use crate::db::classify::{classify, StatementContext, Stage};
use crate::error::RecordResult;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, Rows, Statement};

/// Runs statements against a borrowed connection.
pub struct StatementExecutor<'conn> {
    conn: &'conn Connection,
}

impl<'conn> StatementExecutor<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Executes a mutating statement and returns the number of rows it
    /// changed. Trigger side effects are not counted.
    pub fn execute(
        &self,
        context: StatementContext,
        sql: &str,
        binds: &[Value],
    ) -> RecordResult<usize> {
        let mut stmt = self.prepare_bound(context, sql, binds)?;
        let changed = stmt
            .raw_execute()
            .map_err(|err| classify(context.at(Stage::Step), err))?;
        finalize(context, stmt)?;
        Ok(changed)
    }

    /// Runs a row-returning statement and hands the rows to `consume`.
    ///
    /// `consume` sees each row at most once, in statement order; rows are
    /// decoded on demand by `map_row`. Rows `consume` does not pull are never
    /// stepped. Calling `query` again re-executes the statement.
    pub fn query<T, M, C, R>(
        &self,
        context: StatementContext,
        sql: &str,
        binds: &[Value],
        map_row: M,
        consume: C,
    ) -> RecordResult<R>
    where
        M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
        C: FnOnce(&mut RowSequence<'_, T, M>) -> RecordResult<R>,
    {
        let mut stmt = self.prepare_bound(context, sql, binds)?;
        let result = {
            let mut rows = RowSequence {
                rows: stmt.raw_query(),
                map_row,
                context,
                exhausted: false,
            };
            consume(&mut rows)
        };
        let output = result?;
        finalize(context, stmt)?;
        Ok(output)
    }

    /// Convenience wrapper that materializes every row.
    pub fn query_all<T, M>(
        &self,
        context: StatementContext,
        sql: &str,
        binds: &[Value],
        map_row: M,
    ) -> RecordResult<Vec<T>>
    where
        M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.query(context, sql, binds, map_row, |rows| rows.collect())
    }

    fn prepare_bound(
        &self,
        context: StatementContext,
        sql: &str,
        binds: &[Value],
    ) -> RecordResult<Statement<'conn>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|err| classify(context.at(Stage::Prepare), err))?;
        for (offset, value) in binds.iter().enumerate() {
            let index = offset + 1;
            stmt.raw_bind_parameter(index, value)
                .map_err(|err| classify(context.binding(index), err))?;
        }
        Ok(stmt)
    }
}

fn finalize(context: StatementContext, stmt: Statement<'_>) -> RecordResult<()> {
    stmt.finalize()
        .map_err(|err| classify(context.at(Stage::Finalize), err))
}

/// Lazy rows of one statement execution.
///
/// Finite and single-pass: after the last row (or the first error) it only
/// yields `None`.
pub struct RowSequence<'stmt, T, M>
where
    M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    rows: Rows<'stmt>,
    map_row: M,
    context: StatementContext,
    exhausted: bool,
}

impl<T, M> Iterator for RowSequence<'_, T, M>
where
    M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    type Item = RecordResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.rows.next() {
            Ok(Some(row)) => Some(
                (self.map_row)(row).map_err(|err| classify(self.context.at(Stage::Read), err)),
            ),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(err) => {
                self.exhausted = true;
                Some(Err(classify(self.context.at(Stage::Step), err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StatementExecutor;
    use crate::db::classify::{Operation, Stage, StatementContext};
    use crate::error::RecordError;
    use rusqlite::types::Value;
    use rusqlite::Connection;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL);")
            .unwrap();
        conn
    }

    fn ctx() -> StatementContext {
        StatementContext::new(Operation::Search)
    }

    #[test]
    fn execute_returns_changed_rows() {
        let conn = conn();
        let exec = StatementExecutor::new(&conn);
        let inserted = exec
            .execute(ctx(), "INSERT INTO t (v) VALUES (?1), (?2);", &[
                Value::Integer(1),
                Value::Integer(2),
            ])
            .unwrap();
        assert_eq!(inserted, 2);

        let deleted = exec
            .execute(ctx(), "DELETE FROM t WHERE v > ?1;", &[Value::Integer(5)])
            .unwrap();
        assert_eq!(deleted, 0);
    }

    #[test]
    fn query_is_lazy_and_stops_where_consumer_stops() {
        let conn = conn();
        conn.execute_batch("INSERT INTO t (v) VALUES (1), (2), (3);")
            .unwrap();
        let exec = StatementExecutor::new(&conn);

        let mut decoded = 0;
        let first = exec
            .query(
                ctx(),
                "SELECT v FROM t ORDER BY v;",
                &[],
                |row| {
                    decoded += 1;
                    row.get::<_, i64>(0)
                },
                |rows| rows.next().transpose(),
            )
            .unwrap();
        assert_eq!(first, Some(1));
        assert_eq!(decoded, 1);
    }

    #[test]
    fn bind_failure_reports_parameter_index() {
        let conn = conn();
        let exec = StatementExecutor::new(&conn);
        let err = exec
            .execute(ctx(), "INSERT INTO t (v) VALUES (?1);", &[
                Value::Integer(1),
                Value::Integer(2),
            ])
            .unwrap_err();
        match err {
            RecordError::StorageFault { context, .. } => {
                assert_eq!(context.stage, Stage::Bind);
                assert_eq!(context.bind_index, Some(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn prepare_failure_is_classified() {
        let conn = conn();
        let exec = StatementExecutor::new(&conn);
        let err = exec
            .execute(ctx(), "INSERT INTO missing (v) VALUES (1);", &[])
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::StorageFault { context, .. } if context.stage == Stage::Prepare
        ));
    }

    #[test]
    fn decode_failure_surfaces_as_read_fault() {
        let conn = conn();
        conn.execute_batch("INSERT INTO t (v) VALUES (1);").unwrap();
        let exec = StatementExecutor::new(&conn);
        let err = exec
            .query_all(ctx(), "SELECT v FROM t;", &[], |row| row.get::<_, String>(0))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::StorageFault { context, .. } if context.stage == Stage::Read
        ));
    }
}
