//! Domain records for politicians and their ratings.
//!
//! # Responsibility
//! - Define identity normalization and the value records built on it.
//! - Keep records independent: shared fields live in an embedded `Identity`.
//!
//! # Invariants
//! - Every identity is normalized before it is stored or queried.

pub mod identity;
pub mod politician;
