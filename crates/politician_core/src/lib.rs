//! Core persistence for politicians and their ratings.
//! This crate is the single source of truth for storage invariants.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use db::{close_db, open_db, open_db_in_memory, DbError, DbResult};
pub use error::{RecordError, RecordResult};
pub use logging::{default_log_level, init_logging, logging_status, resolve_log_level};
pub use model::identity::{
    normalize, normalize_with_default_party, parse_confirmation, validate_points, HasIdentity,
    Identity, PoliticianCore, ValidationError, DEFAULT_PARTY,
};
pub use model::politician::{PartyUpdate, Politician, PoliticianListing, Rating};
pub use repo::politician_repo::{PoliticianRepository, SqlitePoliticianRepository};
pub use repo::query::{Projection, SortDirection};
pub use service::record_store::RecordStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
