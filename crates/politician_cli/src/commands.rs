//! Command execution and console rendering.
//!
//! # Responsibility
//! - Preview each mutation, confirm it, then apply it through the store.
//! - Render search results as text blocks or JSON.
//!
//! # Invariants
//! - Nothing is written to the database unless the user confirmed or
//!   `--yes` was given.
//! - An invalid confirmation answer re-prompts; end of input declines.

use log::info;
use politician_core::model::identity::normalize_party;
use politician_core::{
    normalize_with_default_party, parse_confirmation, ConfigError, DbError, Identity, PartyUpdate,
    Politician, PoliticianListing, PoliticianRepository, Rating, RecordError, RecordStore,
    DEFAULT_PARTY,
};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

/// Failures reported to the user before exiting with status 1.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Record(RecordError),
    Json(serde_json::Error),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Configuration error: {err}"),
            Self::Logging(message) => write!(f, "Logging error: {message}"),
            Self::Db(err) => write!(f, "Database error: {err}"),
            Self::Record(RecordError::Validation(err)) => write!(f, "Invalid input: {err}"),
            Self::Record(err) => write!(f, "Database error: {err}"),
            Self::Json(err) => write!(f, "Output error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<RecordError> for CliError {
    fn from(value: RecordError) -> Self {
        Self::Record(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// One command invocation: a store plus the console it talks to.
///
/// `errors` receives failure notices that are not errors of the command
/// itself, such as "not found" outcomes.
pub struct Session<'a, R: PoliticianRepository, I: BufRead, O: Write, E: Write> {
    pub store: &'a RecordStore<R>,
    pub input: I,
    pub output: O,
    pub errors: E,
    pub assume_yes: bool,
    pub json: bool,
}

impl<R: PoliticianRepository, I: BufRead, O: Write, E: Write> Session<'_, R, I, O, E> {
    pub fn register(
        &mut self,
        name: &str,
        party: Option<&str>,
        info: Option<&str>,
    ) -> Result<(), CliError> {
        let information = info.map(expand_newlines);
        let preview = Politician {
            identity: normalize_with_default_party(name, party).map_err(RecordError::from)?,
            information: information.clone(),
            total_rating: 0,
        };
        write!(self.output, "{preview}")?;
        if !self.confirm("insertion")? {
            return self.cancelled();
        }
        let Identity { name, party } = &preview.identity;
        let rows = self.store.register(name, party, information.as_deref())?;
        self.report(rows, "Successfully inserted.", "Insertion failed.")
    }

    pub fn rate(
        &mut self,
        name: &str,
        party: Option<&str>,
        points: i64,
        description: Option<&str>,
    ) -> Result<(), CliError> {
        let description = description.map(expand_newlines);
        let preview = Rating {
            identity: normalize_with_default_party(name, party).map_err(RecordError::from)?,
            points,
            description: description.clone(),
            created_at: String::new(),
        };
        write!(self.output, "{preview}")?;
        if !self.confirm("rating")? {
            return self.cancelled();
        }
        let Identity { name, party } = &preview.identity;
        let rows = self
            .store
            .rate(name, party, points, description.as_deref())?;
        self.report(rows, "Successfully inserted.", "Insertion failed.")
    }

    pub fn update(
        &mut self,
        name: &str,
        old_party: Option<&str>,
        new_party: Option<&str>,
    ) -> Result<(), CliError> {
        let preview = PartyUpdate {
            identity: normalize_with_default_party(name, old_party).map_err(RecordError::from)?,
            new_party: normalize_party(new_party.unwrap_or(DEFAULT_PARTY))
                .map_err(RecordError::from)?,
        };
        write!(self.output, "{preview}")?;
        if !self.confirm("update")? {
            return self.cancelled();
        }
        let Identity { name, party } = &preview.identity;
        let rows = self.store.update_party(name, party, &preview.new_party)?;
        self.report(
            rows,
            "Successfully updated.",
            "Update failed. The politician was not found.",
        )
    }

    pub fn delete(&mut self, name: &str, party: Option<&str>) -> Result<(), CliError> {
        let preview = normalize_with_default_party(name, party).map_err(RecordError::from)?;
        write!(self.output, "{preview}")?;
        if !self.confirm("deletion")? {
            return self.cancelled();
        }
        let rows = self.store.delete_politician(&preview.name, &preview.party)?;
        self.report(
            rows,
            "Successfully deleted.",
            "Deletion failed. The politician was not found.",
        )
    }

    pub fn search_name(&mut self, name: &str) -> Result<(), CliError> {
        let politicians = self.store.find_by_name(name)?;
        self.print_records(&politicians)
    }

    pub fn search_party(&mut self, party: &str) -> Result<(), CliError> {
        let politicians = self.store.find_by_party(party)?;
        self.print_records(&politicians)
    }

    pub fn search_ratings(&mut self, name: &str, party: Option<&str>) -> Result<(), CliError> {
        let identity = normalize_with_default_party(name, party).map_err(RecordError::from)?;
        let ratings = self.store.ratings_for(&identity.name, &identity.party)?;
        self.print_records(&ratings)
    }

    pub fn search_all(&mut self, reverse: bool, full: bool) -> Result<(), CliError> {
        let direction = politician_core::SortDirection::from_reverse(reverse);
        match self.store.list_all(direction, !full)? {
            PoliticianListing::Full(politicians) => self.print_records(&politicians),
            PoliticianListing::Compact(identities) => self.print_records::<Identity>(&identities),
        }
    }

    fn confirm(&mut self, operation: &str) -> Result<bool, CliError> {
        if self.assume_yes {
            return Ok(true);
        }
        loop {
            write!(self.output, "\nConfirm {operation}? [y]es/[n]o ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }
            match parse_confirmation(&answer) {
                Ok(confirmed) => return Ok(confirmed),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    fn cancelled(&mut self) -> Result<(), CliError> {
        info!("event=cli_confirm module=cli status=declined");
        writeln!(self.output, "Operation cancelled.")?;
        Ok(())
    }

    fn report(&mut self, rows: usize, success: &str, not_found: &str) -> Result<(), CliError> {
        if rows > 0 {
            writeln!(self.output, "{success}")?;
        } else {
            info!("event=cli_outcome module=cli status=not_found");
            writeln!(self.errors, "{not_found}")?;
        }
        Ok(())
    }

    fn print_records<T: Display + Serialize>(&mut self, records: &[T]) -> Result<(), CliError> {
        if self.json {
            serde_json::to_writer_pretty(&mut self.output, records)?;
            writeln!(self.output)?;
            return Ok(());
        }
        for record in records {
            writeln!(self.output, "{record}")?;
        }
        writeln!(self.output, "{} results returned.", records.len())?;
        Ok(())
    }
}

/// Turns the two-character sequence `\n` typed on a shell into a newline.
fn expand_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}
