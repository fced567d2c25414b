//! Politician and rating records.
//!
//! # Responsibility
//! - Define the value records returned by the record store.
//! - Render records for console output via `Display`.
//!
//! # Invariants
//! - Every record embeds a normalized [`Identity`]; none inherits from another.
//! - `total_rating` is read-only for callers; storage maintains it.

use crate::model::identity::{HasIdentity, Identity};
use serde::Serialize;
use std::fmt::{Display, Formatter};

const MISSING_TEXT: &str = "N/A";

/// Full politician row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Politician {
    #[serde(flatten)]
    pub identity: Identity,
    /// Free-form biography; `None` when registered without one.
    pub information: Option<String>,
    /// Sum of all rating points, kept current by the insert trigger.
    pub total_rating: i64,
}

/// One time-stamped rating of a politician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rating {
    #[serde(flatten)]
    pub identity: Identity,
    pub points: i64,
    pub description: Option<String>,
    /// Local insert time, `YYYY-MM-DD HH:MM:SS.ffffff`.
    pub created_at: String,
}

/// Request to move a politician to another party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyUpdate {
    #[serde(flatten)]
    pub identity: Identity,
    pub new_party: String,
}

/// Result of a "list all" query in either projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PoliticianListing {
    Full(Vec<Politician>),
    Compact(Vec<Identity>),
}

impl PoliticianListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Full(rows) => rows.len(),
            Self::Compact(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identities in listing order, regardless of projection.
    pub fn identities(&self) -> Vec<&Identity> {
        match self {
            Self::Full(rows) => rows.iter().map(HasIdentity::identity).collect(),
            Self::Compact(rows) => rows.iter().collect(),
        }
    }
}

impl HasIdentity for Politician {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl HasIdentity for Rating {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl HasIdentity for PartyUpdate {
    fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl Display for Politician {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity)?;
        writeln!(f, "Rating points: {}", self.total_rating)?;
        writeln!(
            f,
            "Information: {}",
            self.information.as_deref().unwrap_or(MISSING_TEXT)
        )
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity)?;
        writeln!(f, "Points: {}", self.points)?;
        if !self.created_at.is_empty() {
            writeln!(f, "Date/time: {}", self.created_at)?;
        }
        writeln!(
            f,
            "Description: {}",
            self.description.as_deref().unwrap_or(MISSING_TEXT)
        )
    }
}

impl Display for PartyUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity)?;
        writeln!(f, "New party: {}", self.new_party)
    }
}

#[cfg(test)]
mod tests {
    use super::{Politician, PoliticianListing, Rating};
    use crate::model::identity::{HasIdentity, Identity};

    fn identity() -> Identity {
        Identity::new("alice", "green").unwrap()
    }

    #[test]
    fn politician_renders_placeholder_for_missing_information() {
        let politician = Politician {
            identity: identity(),
            information: None,
            total_rating: 3,
        };
        let rendered = politician.to_string();
        assert!(rendered.contains("Name: ALICE"));
        assert!(rendered.contains("Rating points: 3"));
        assert!(rendered.contains("Information: N/A"));
    }

    #[test]
    fn rating_omits_empty_timestamp_line() {
        let rating = Rating {
            identity: identity(),
            points: -2,
            description: Some("bad".to_string()),
            created_at: String::new(),
        };
        let rendered = rating.to_string();
        assert!(!rendered.contains("Date/time"));
        assert!(rendered.contains("Description: bad"));
        assert_eq!(rating.party(), "GREEN");
    }

    #[test]
    fn listing_reports_identities_in_order() {
        let listing = PoliticianListing::Compact(vec![
            Identity::new("b", "x").unwrap(),
            Identity::new("a", "x").unwrap(),
        ]);
        assert_eq!(listing.len(), 2);
        let names: Vec<&str> = listing
            .identities()
            .into_iter()
            .map(|id| id.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn records_serialize_identity_fields_flat() {
        let politician = Politician {
            identity: identity(),
            information: None,
            total_rating: 4,
        };
        let value = serde_json::to_value(&politician).unwrap();
        assert_eq!(value["name"], "ALICE");
        assert_eq!(value["party"], "GREEN");
        assert_eq!(value["total_rating"], 4);
        assert!(value["information"].is_null());
        assert!(value.get("identity").is_none());

        let rating = Rating {
            identity: identity(),
            points: -1,
            description: Some("late".to_string()),
            created_at: "2024-01-01 10:00:00.000001".to_string(),
        };
        let value = serde_json::to_value(&rating).unwrap();
        assert_eq!(value["name"], "ALICE");
        assert_eq!(value["party"], "GREEN");
        assert_eq!(value["points"], -1);
        assert_eq!(value["created_at"], "2024-01-01 10:00:00.000001");
        assert!(value.get("identity").is_none());
    }
}
