//! Politician identity and input normalization.
//!
//! # Responsibility
//! - Canonicalize the natural key `(name, party)` before it reaches SQL.
//! - Provide pure validation helpers for interactive data entry.
//!
//! # Invariants
//! - Stored and queried identity fields are trimmed and upper-cased with
//!   Unicode case mapping, never ASCII-only mapping.
//! - An `Identity` value never holds an empty name or party.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Party assigned when a caller omits it.
pub const DEFAULT_PARTY: &str = "NONE";
/// Lowest accepted rating value.
pub const MIN_POINTS: i64 = -5;
/// Highest accepted rating value.
pub const MAX_POINTS: i64 = 5;

/// Caller input rejected before any statement is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    EmptyParty,
    InvalidSortDirection(String),
    PointsOutOfRange(i64),
    InvalidConfirmation(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "politician name cannot be empty"),
            Self::EmptyParty => write!(f, "politician party cannot be empty"),
            Self::InvalidSortDirection(value) => {
                write!(f, "invalid sort direction `{value}`; expected ASC|DESC")
            }
            Self::PointsOutOfRange(value) => write!(
                f,
                "rating points must be between {MIN_POINTS} and {MAX_POINTS}, got {value}"
            ),
            Self::InvalidConfirmation(value) => {
                write!(f, "invalid option `{value}`; expected y|n")
            }
        }
    }
}

impl Error for ValidationError {}

/// Capability of records that belong to one politician identity.
pub trait HasIdentity {
    fn identity(&self) -> &Identity;

    fn name(&self) -> &str {
        &self.identity().name
    }

    fn party(&self) -> &str {
        &self.identity().party
    }
}

/// Normalized `(name, party)` key. Doubles as the compact listing row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Identity {
    pub name: String,
    pub party: String,
}

/// Compact projection of a politician: identity fields only.
pub type PoliticianCore = Identity;

impl Identity {
    /// Builds a normalized identity from raw caller input.
    pub fn new(name: &str, party: &str) -> Result<Self, ValidationError> {
        normalize(name, party)
    }

    /// Builds an identity from values already read back from storage.
    ///
    /// Stored values went through [`normalize`] on the way in, so no further
    /// mapping is applied.
    pub(crate) fn from_stored(name: String, party: String) -> Self {
        Self { name, party }
    }
}

impl HasIdentity for Identity {
    fn identity(&self) -> &Identity {
        self
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Party: {}", self.party)
    }
}

/// Normalizes both identity fields.
///
/// # Errors
/// - `EmptyName` / `EmptyParty` when a field is empty after trimming.
pub fn normalize(name: &str, party: &str) -> Result<Identity, ValidationError> {
    Ok(Identity {
        name: normalize_name(name)?,
        party: normalize_party(party)?,
    })
}

/// Normalizes an identity whose party may be omitted.
///
/// A missing party falls back to [`DEFAULT_PARTY`]; name stays mandatory.
pub fn normalize_with_default_party(
    name: &str,
    party: Option<&str>,
) -> Result<Identity, ValidationError> {
    normalize(name, party.unwrap_or(DEFAULT_PARTY))
}

/// Normalizes a single name key.
pub fn normalize_name(name: &str) -> Result<String, ValidationError> {
    canonical(name).ok_or(ValidationError::EmptyName)
}

/// Normalizes a single party key.
pub fn normalize_party(party: &str) -> Result<String, ValidationError> {
    canonical(party).ok_or(ValidationError::EmptyParty)
}

fn canonical(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// Checks rating points against the accepted range.
///
/// The store itself leaves this to the `CHECK` constraint; interactive
/// callers use this to re-prompt without a round trip.
pub fn validate_points(points: i64) -> Result<i64, ValidationError> {
    if (MIN_POINTS..=MAX_POINTS).contains(&points) {
        Ok(points)
    } else {
        Err(ValidationError::PointsOutOfRange(points))
    }
}

/// Parses a yes/no confirmation answer (`y`, `Y`, `n`, `N`).
pub fn parse_confirmation(answer: &str) -> Result<bool, ValidationError> {
    match answer.trim() {
        "y" | "Y" => Ok(true),
        "n" | "N" => Ok(false),
        other => Err(ValidationError::InvalidConfirmation(other.to_string())),
    }
}
