//! SQL text for politician and rating statements.
//!
//! # Responsibility
//! - Hold every statement the repository runs.
//! - Build the "list all" variants with a validated sort direction.
//!
//! # Invariants
//! - The sort direction is the only text ever substituted into SQL, and it
//!   comes from the closed [`SortDirection`] enum.
//! - Listing ties are broken by `name ASC, party ASC` for both directions.

use crate::model::identity::ValidationError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub(crate) const INSERT_POLITICIAN_SQL: &str =
    "INSERT INTO politician (name, party, information) VALUES (?1, ?2, ?3);";

pub(crate) const INSERT_RATING_SQL: &str = "INSERT INTO ratings (
    polit_name,
    polit_party,
    points,
    description,
    created_at
) VALUES (?1, ?2, ?3, ?4, ?5);";

pub(crate) const UPDATE_PARTY_SQL: &str =
    "UPDATE politician SET party = ?1 WHERE name = ?2 AND party = ?3;";

pub(crate) const DELETE_POLITICIAN_SQL: &str =
    "DELETE FROM politician WHERE name = ?1 AND party = ?2;";

const POLITICIAN_SELECT_SQL: &str = "SELECT
    name,
    party,
    information,
    total_rating
FROM politician";

pub(crate) const SEARCH_BY_NAME_SQL: &str =
    "SELECT name, party, information, total_rating FROM politician
     WHERE name = ?1
     ORDER BY party ASC;";

pub(crate) const SEARCH_BY_PARTY_SQL: &str =
    "SELECT name, party, information, total_rating FROM politician
     WHERE party = ?1
     ORDER BY name ASC;";

pub(crate) const RATINGS_FOR_SQL: &str = "SELECT
    polit_name,
    polit_party,
    points,
    description,
    created_at
FROM ratings
WHERE polit_name = ?1 AND polit_party = ?2
ORDER BY created_at ASC;";

const DIRECTION_PLACEHOLDER: &str = "{direction}";
const LIST_ORDER_TEMPLATE: &str = " ORDER BY total_rating {direction}, name ASC, party ASC;";

/// Ordering of the aggregate rating in "list all" queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    /// Highest rated first.
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// `Asc` when `reverse` is set, otherwise the default `Desc`.
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    /// Accepts exactly `ASC` or `DESC`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(ValidationError::InvalidSortDirection(other.to_string())),
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Column set returned by a "list all" query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Every politician column.
    Full,
    /// Identity columns only.
    Compact,
}

impl Projection {
    pub fn from_compact(compact: bool) -> Self {
        if compact {
            Self::Compact
        } else {
            Self::Full
        }
    }
}

/// Builds the "list all politicians" statement.
pub fn list_politicians_sql(projection: Projection, direction: SortDirection) -> String {
    let select = match projection {
        Projection::Full => POLITICIAN_SELECT_SQL,
        Projection::Compact => "SELECT name, party FROM politician",
    };
    let order = LIST_ORDER_TEMPLATE.replace(DIRECTION_PLACEHOLDER, direction.as_sql());
    format!("{select}{order}")
}

#[cfg(test)]
mod tests {
    use super::{list_politicians_sql, Projection, SortDirection};
    use crate::model::identity::ValidationError;

    #[test]
    fn direction_parses_exact_tokens_only() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);

        for rejected in ["UP", "asc", " DESC", "DESC; DROP TABLE politician", ""] {
            assert_eq!(
                rejected.parse::<SortDirection>().unwrap_err(),
                ValidationError::InvalidSortDirection(rejected.to_string())
            );
        }
    }

    #[test]
    fn list_sql_embeds_direction_and_fixed_tie_break() {
        let full = list_politicians_sql(Projection::Full, SortDirection::Desc);
        assert!(full.starts_with("SELECT\n    name,"));
        assert!(full.ends_with("ORDER BY total_rating DESC, name ASC, party ASC;"));

        let compact = list_politicians_sql(Projection::Compact, SortDirection::Asc);
        assert_eq!(
            compact,
            "SELECT name, party FROM politician ORDER BY total_rating ASC, name ASC, party ASC;"
        );
    }

    #[test]
    fn reverse_flag_selects_ascending() {
        assert_eq!(SortDirection::from_reverse(true), SortDirection::Asc);
        assert_eq!(SortDirection::from_reverse(false), SortDirection::default());
    }
}
