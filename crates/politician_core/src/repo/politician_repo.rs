//! Politician/rating repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map normalized records to parameterized statements and back.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Inputs are already normalized; this layer never re-cases identity text.
//! - Every statement runs through [`StatementExecutor`], so failures arrive
//!   classified and no prepared statement outlives a call.

use crate::db::classify::{Operation, StatementContext};
use crate::db::executor::StatementExecutor;
use crate::error::RecordResult;
use crate::model::identity::Identity;
use crate::model::politician::{PartyUpdate, Politician, Rating};
use crate::repo::query::{
    list_politicians_sql, Projection, SortDirection, DELETE_POLITICIAN_SQL,
    INSERT_POLITICIAN_SQL, INSERT_RATING_SQL, RATINGS_FOR_SQL, SEARCH_BY_NAME_SQL,
    SEARCH_BY_PARTY_SQL, UPDATE_PARTY_SQL,
};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

/// Politician registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolitician {
    pub identity: Identity,
    pub information: Option<String>,
}

/// Rating insertion input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub identity: Identity,
    pub points: i64,
    pub description: Option<String>,
    pub created_at: String,
}

/// Repository interface for politician and rating persistence.
///
/// Mutations return the number of rows the statement changed.
pub trait PoliticianRepository {
    fn insert_politician(&self, politician: &NewPolitician) -> RecordResult<usize>;
    fn insert_rating(&self, rating: &NewRating) -> RecordResult<usize>;
    fn update_party(&self, update: &PartyUpdate) -> RecordResult<usize>;
    fn delete_politician(&self, identity: &Identity) -> RecordResult<usize>;
    fn politicians_by_name(&self, name: &str) -> RecordResult<Vec<Politician>>;
    fn politicians_by_party(&self, party: &str) -> RecordResult<Vec<Politician>>;
    fn ratings_for(&self, identity: &Identity) -> RecordResult<Vec<Rating>>;
    fn list_politicians(&self, direction: SortDirection) -> RecordResult<Vec<Politician>>;
    fn list_identities(&self, direction: SortDirection) -> RecordResult<Vec<Identity>>;
}

/// SQLite-backed politician repository.
pub struct SqlitePoliticianRepository<'conn> {
    executor: StatementExecutor<'conn>,
}

impl<'conn> SqlitePoliticianRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            executor: StatementExecutor::new(conn),
        }
    }
}

impl PoliticianRepository for SqlitePoliticianRepository<'_> {
    fn insert_politician(&self, politician: &NewPolitician) -> RecordResult<usize> {
        self.executor.execute(
            StatementContext::new(Operation::InsertPolitician),
            INSERT_POLITICIAN_SQL,
            &[
                text(&politician.identity.name),
                text(&politician.identity.party),
                optional_text(politician.information.as_deref()),
            ],
        )
    }

    fn insert_rating(&self, rating: &NewRating) -> RecordResult<usize> {
        self.executor.execute(
            StatementContext::new(Operation::InsertRating),
            INSERT_RATING_SQL,
            &[
                text(&rating.identity.name),
                text(&rating.identity.party),
                Value::Integer(rating.points),
                optional_text(rating.description.as_deref()),
                text(&rating.created_at),
            ],
        )
    }

    fn update_party(&self, update: &PartyUpdate) -> RecordResult<usize> {
        self.executor.execute(
            StatementContext::new(Operation::UpdateParty),
            UPDATE_PARTY_SQL,
            &[
                text(&update.new_party),
                text(&update.identity.name),
                text(&update.identity.party),
            ],
        )
    }

    fn delete_politician(&self, identity: &Identity) -> RecordResult<usize> {
        self.executor.execute(
            StatementContext::new(Operation::DeletePolitician),
            DELETE_POLITICIAN_SQL,
            &[text(&identity.name), text(&identity.party)],
        )
    }

    fn politicians_by_name(&self, name: &str) -> RecordResult<Vec<Politician>> {
        self.executor.query_all(
            StatementContext::new(Operation::Search),
            SEARCH_BY_NAME_SQL,
            &[text(name)],
            parse_politician_row,
        )
    }

    fn politicians_by_party(&self, party: &str) -> RecordResult<Vec<Politician>> {
        self.executor.query_all(
            StatementContext::new(Operation::Search),
            SEARCH_BY_PARTY_SQL,
            &[text(party)],
            parse_politician_row,
        )
    }

    fn ratings_for(&self, identity: &Identity) -> RecordResult<Vec<Rating>> {
        self.executor.query_all(
            StatementContext::new(Operation::Search),
            RATINGS_FOR_SQL,
            &[text(&identity.name), text(&identity.party)],
            parse_rating_row,
        )
    }

    fn list_politicians(&self, direction: SortDirection) -> RecordResult<Vec<Politician>> {
        self.executor.query_all(
            StatementContext::new(Operation::Search),
            &list_politicians_sql(Projection::Full, direction),
            &[],
            parse_politician_row,
        )
    }

    fn list_identities(&self, direction: SortDirection) -> RecordResult<Vec<Identity>> {
        self.executor.query_all(
            StatementContext::new(Operation::Search),
            &list_politicians_sql(Projection::Compact, direction),
            &[],
            parse_identity_row,
        )
    }
}

fn parse_identity_row(row: &Row<'_>) -> rusqlite::Result<Identity> {
    Ok(Identity::from_stored(row.get("name")?, row.get("party")?))
}

fn parse_politician_row(row: &Row<'_>) -> rusqlite::Result<Politician> {
    Ok(Politician {
        identity: parse_identity_row(row)?,
        information: row.get("information")?,
        // Rows written outside this crate may carry NULL here.
        total_rating: row.get::<_, Option<i64>>("total_rating")?.unwrap_or(0),
    })
}

fn parse_rating_row(row: &Row<'_>) -> rusqlite::Result<Rating> {
    Ok(Rating {
        identity: Identity::from_stored(row.get("polit_name")?, row.get("polit_party")?),
        points: row.get("points")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}
