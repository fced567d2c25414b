//! Record store use-case service.
//!
//! # Responsibility
//! - Provide the public register/rate/update/delete/search/list API.
//! - Normalize identity keys before they reach the repository.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Every read and write key passes through the identity normalizer.
//! - No match is an empty result, never an error.
//! - Zero affected rows on update/delete means "not found" and is returned
//!   as `Ok(0)`.
//! - Rating timestamps are assigned here, never by callers of `rate`.

use crate::error::{RecordError, RecordResult};
use crate::model::identity::{normalize, normalize_name, normalize_party};
use crate::model::politician::{PartyUpdate, Politician, PoliticianListing, Rating};
use crate::repo::politician_repo::{
    NewPolitician, NewRating, PoliticianRepository, SqlitePoliticianRepository,
};
use crate::repo::query::{Projection, SortDirection};
use log::{debug, info, warn};
use rusqlite::Connection;
use std::time::Instant;

/// Timestamp layout for `ratings.created_at`.
pub const RATING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Facade over politician and rating persistence.
pub struct RecordStore<R: PoliticianRepository> {
    repo: R,
}

impl<'conn> RecordStore<SqlitePoliticianRepository<'conn>> {
    /// Creates a store backed by a bootstrapped SQLite connection.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(SqlitePoliticianRepository::new(conn))
    }
}

impl<R: PoliticianRepository> RecordStore<R> {
    /// Creates a store using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new politician.
    ///
    /// # Errors
    /// - `Validation` for an empty name or party.
    /// - `DuplicateIdentity` when the normalized identity exists already.
    pub fn register(
        &self,
        name: &str,
        party: &str,
        information: Option<&str>,
    ) -> RecordResult<usize> {
        let started_at = Instant::now();
        let result = normalize(name, party)
            .map_err(RecordError::from)
            .and_then(|identity| {
                self.repo.insert_politician(&NewPolitician {
                    identity,
                    information: information.map(str::to_string),
                })
            });
        log_mutation("politician_register", started_at, &result);
        result
    }

    /// Adds a rating stamped with the current local time.
    ///
    /// # Errors
    /// - `OutOfRangePoints` when `points` is outside `[-5, 5]`.
    /// - `OrphanRating` when the politician does not exist.
    pub fn rate(
        &self,
        name: &str,
        party: &str,
        points: i64,
        description: Option<&str>,
    ) -> RecordResult<usize> {
        let created_at = chrono::Local::now()
            .format(RATING_TIMESTAMP_FORMAT)
            .to_string();
        self.rate_at(name, party, points, description, &created_at)
    }

    /// Adds a rating with a caller-chosen timestamp.
    ///
    /// # Errors
    /// As [`Self::rate`], plus `DuplicateRating` when the politician already
    /// has a rating at `created_at`.
    pub fn rate_at(
        &self,
        name: &str,
        party: &str,
        points: i64,
        description: Option<&str>,
        created_at: &str,
    ) -> RecordResult<usize> {
        let started_at = Instant::now();
        let result = normalize(name, party)
            .map_err(RecordError::from)
            .and_then(|identity| {
                self.repo.insert_rating(&NewRating {
                    identity,
                    points,
                    description: description.map(str::to_string),
                    created_at: created_at.to_string(),
                })
            });
        log_mutation("rating_insert", started_at, &result);
        result
    }

    /// Moves a politician to `new_party`; ratings follow by cascade.
    ///
    /// Returns `Ok(0)` when no politician matches `(name, old_party)`.
    pub fn update_party(
        &self,
        name: &str,
        old_party: &str,
        new_party: &str,
    ) -> RecordResult<usize> {
        let started_at = Instant::now();
        let result = build_party_update(name, old_party, new_party)
            .and_then(|update| self.repo.update_party(&update));
        log_mutation("politician_update_party", started_at, &result);
        result
    }

    /// Deletes a politician and, by cascade, all of its ratings.
    ///
    /// Returns `Ok(0)` when no politician matches.
    pub fn delete_politician(&self, name: &str, party: &str) -> RecordResult<usize> {
        let started_at = Instant::now();
        let result = normalize(name, party)
            .map_err(RecordError::from)
            .and_then(|identity| self.repo.delete_politician(&identity));
        log_mutation("politician_delete", started_at, &result);
        result
    }

    /// Returns every politician with the given name, across parties.
    pub fn find_by_name(&self, name: &str) -> RecordResult<Vec<Politician>> {
        let started_at = Instant::now();
        let result = normalize_name(name)
            .map_err(RecordError::from)
            .and_then(|name| self.repo.politicians_by_name(&name));
        log_read("politician_search_name", started_at, &result, Vec::len);
        result
    }

    /// Returns every politician of the given party.
    pub fn find_by_party(&self, party: &str) -> RecordResult<Vec<Politician>> {
        let started_at = Instant::now();
        let result = normalize_party(party)
            .map_err(RecordError::from)
            .and_then(|party| self.repo.politicians_by_party(&party));
        log_read("politician_search_party", started_at, &result, Vec::len);
        result
    }

    /// Returns a politician's ratings, oldest first.
    pub fn ratings_for(&self, name: &str, party: &str) -> RecordResult<Vec<Rating>> {
        let started_at = Instant::now();
        let result = normalize(name, party)
            .map_err(RecordError::from)
            .and_then(|identity| self.repo.ratings_for(&identity));
        log_read("rating_search", started_at, &result, Vec::len);
        result
    }

    /// Lists all politicians ordered by aggregate rating.
    ///
    /// `compact` selects identity-only rows.
    pub fn list_all(
        &self,
        direction: SortDirection,
        compact: bool,
    ) -> RecordResult<PoliticianListing> {
        let started_at = Instant::now();
        let result = match Projection::from_compact(compact) {
            Projection::Compact => self
                .repo
                .list_identities(direction)
                .map(PoliticianListing::Compact),
            Projection::Full => self
                .repo
                .list_politicians(direction)
                .map(PoliticianListing::Full),
        };
        log_read("politician_list", started_at, &result, PoliticianListing::len);
        result
    }

    /// Like [`Self::list_all`], parsing `direction` (`ASC`|`DESC`) first.
    ///
    /// # Errors
    /// - `Validation` for any other direction; nothing is executed then.
    pub fn list_all_by(&self, direction: &str, compact: bool) -> RecordResult<PoliticianListing> {
        let direction = direction.parse::<SortDirection>()?;
        self.list_all(direction, compact)
    }
}

fn build_party_update(
    name: &str,
    old_party: &str,
    new_party: &str,
) -> RecordResult<PartyUpdate> {
    let identity = normalize(name, old_party)?;
    let new_party = normalize_party(new_party)?;
    Ok(PartyUpdate {
        identity,
        new_party,
    })
}

fn log_mutation(event: &str, started_at: Instant, result: &RecordResult<usize>) {
    match result {
        Ok(rows) => info!(
            "event={} module=store status=ok rows={} duration_ms={}",
            event,
            rows,
            started_at.elapsed().as_millis()
        ),
        Err(err) => log_failure(event, started_at, err),
    }
}

fn log_read<T>(
    event: &str,
    started_at: Instant,
    result: &RecordResult<T>,
    count: fn(&T) -> usize,
) {
    match result {
        Ok(rows) => debug!(
            "event={} module=store status=ok rows={} duration_ms={}",
            event,
            count(rows),
            started_at.elapsed().as_millis()
        ),
        Err(err) => log_failure(event, started_at, err),
    }
}

fn log_failure(event: &str, started_at: Instant, err: &RecordError) {
    if err.is_constraint_violation() || matches!(err, RecordError::Validation(_)) {
        info!(
            "event={} module=store status=rejected error_code={} duration_ms={}",
            event,
            err.code(),
            started_at.elapsed().as_millis()
        );
    } else {
        warn!(
            "event={} module=store status=error error_code={} duration_ms={} error={}",
            event,
            err.code(),
            started_at.elapsed().as_millis(),
            err
        );
    }
}
