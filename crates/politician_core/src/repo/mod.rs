//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query text from record store orchestration.
//!
//! # Invariants
//! - Repository inputs are normalized identities; normalization happens in
//!   the service layer.
//! - Repository APIs return classified `RecordError`s, never raw SQLite
//!   errors.

pub mod politician_repo;
pub mod query;
