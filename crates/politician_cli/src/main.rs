//! Command line front end for the politician rating store.
//!
//! # Responsibility
//! - Parse arguments, resolve storage locations, start logging.
//! - Open the database once and hand it to the command layer.
//!
//! # Invariants
//! - The connection is closed before the process exits, on every path that
//!   opened it.
//! - Exit code is 0 on success and 1 on any reported error.

mod commands;

use clap::{Parser, Subcommand};
use commands::CliError;
use log::info;
use politician_core::{
    close_db, init_logging, open_db, resolve_log_level, validate_points, RecordStore, StoreConfig,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// Rate and search politicians.
#[derive(Parser)]
#[command(name = "politician")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Database file (default: $HOME/.local/share/politician/data.db).
    #[arg(long, global = true, env = "POLITICIAN_DB")]
    db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true, env = "POLITICIAN_LOG")]
    log_level: Option<String>,

    /// Skip the confirmation prompt for mutations.
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Print search results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Register a new politician in the database.
    Register {
        /// Name of the politician.
        #[arg(short, long)]
        name: String,

        /// Party of the politician [default: NONE].
        #[arg(short, long)]
        party: Option<String>,

        /// General information for the politician.
        #[arg(short, long)]
        info: Option<String>,
    },

    /// Add a new rate to an existing politician.
    Rate {
        /// Name of the politician.
        #[arg(short, long)]
        name: String,

        /// Party of the politician [default: NONE].
        #[arg(short, long)]
        party: Option<String>,

        /// Rating points to add/subtract [-5 to 5].
        #[arg(
            short = 'r',
            long = "rate",
            allow_negative_numbers = true,
            value_parser = parse_points
        )]
        points: i64,

        /// Description or reason for the rate.
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Update the party of a politician.
    Update {
        /// Name of the politician.
        #[arg(short, long)]
        name: String,

        /// Old party [default: NONE].
        #[arg(short, long = "old-party")]
        old_party: Option<String>,

        /// New party [default: NONE].
        #[arg(short = 'p', long = "new-party")]
        new_party: Option<String>,
    },

    /// Delete a politician of the database.
    Delete {
        /// Name of the politician.
        #[arg(short, long)]
        name: String,

        /// Party of the politician [default: NONE].
        #[arg(short, long)]
        party: Option<String>,
    },

    /// Search options.
    Search {
        #[command(subcommand)]
        target: SearchTarget,
    },
}

/// Search subcommands.
#[derive(Subcommand)]
enum SearchTarget {
    /// Search a politician by name.
    Name {
        /// Name of the politician.
        name: String,
    },

    /// Show all politicians belonging to a party.
    Party {
        /// Party to be searched.
        party: String,
    },

    /// Show all ratings belonging to a politician.
    Ratings {
        /// Name of the politician.
        #[arg(short, long)]
        name: String,

        /// Party of the politician [default: NONE].
        #[arg(short, long)]
        party: Option<String>,
    },

    /// Show all politicians ordered by highest rating.
    All {
        /// Order by lowest to highest rating.
        #[arg(short, long)]
        reverse: bool,

        /// Include information and rating points of each politician.
        #[arg(short, long)]
        full: bool,
    },
}

fn parse_points(value: &str) -> Result<i64, String> {
    let points = value
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("`{value}` is not a whole number: {err}"))?;
    validate_points(points).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = StoreConfig::resolve(cli.db).map_err(CliError::Config)?;
    std::fs::create_dir_all(config.data_dir()).map_err(CliError::Io)?;

    let level = resolve_log_level(cli.log_level.as_deref()).map_err(CliError::Logging)?;
    init_logging(level, &config.log_dir).map_err(CliError::Logging)?;

    let conn = open_db(&config.db_path).map_err(CliError::Db)?;
    info!("event=cli_command module=cli status=start");

    let result = {
        let store = RecordStore::sqlite(&conn);
        let stdin = io::stdin();
        let mut session = commands::Session {
            store: &store,
            input: stdin.lock(),
            output: io::stdout().lock(),
            errors: io::stderr().lock(),
            assume_yes: cli.yes,
            json: cli.json,
        };
        dispatch(&mut session, cli.command)
    };

    if !close_db(conn) {
        eprintln!("Warning: the database connection did not close cleanly.");
    }
    result
}

fn dispatch<R, I, O, E>(
    session: &mut commands::Session<'_, R, I, O, E>,
    command: Command,
) -> Result<(), CliError>
where
    R: politician_core::PoliticianRepository,
    I: io::BufRead,
    O: io::Write,
    E: io::Write,
{
    match command {
        Command::Register { name, party, info } => {
            session.register(&name, party.as_deref(), info.as_deref())
        }
        Command::Rate {
            name,
            party,
            points,
            description,
        } => session.rate(&name, party.as_deref(), points, description.as_deref()),
        Command::Update {
            name,
            old_party,
            new_party,
        } => session.update(&name, old_party.as_deref(), new_party.as_deref()),
        Command::Delete { name, party } => session.delete(&name, party.as_deref()),
        Command::Search { target } => match target {
            SearchTarget::Name { name } => session.search_name(&name),
            SearchTarget::Party { party } => session.search_party(&party),
            SearchTarget::Ratings { name, party } => {
                session.search_ratings(&name, party.as_deref())
            }
            SearchTarget::All { reverse, full } => session.search_all(reverse, full),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_points, Cli, Command, SearchTarget};
    use clap::Parser;

    #[test]
    fn points_parser_enforces_range() {
        assert_eq!(parse_points("-5").unwrap(), -5);
        assert_eq!(parse_points("5").unwrap(), 5);
        assert!(parse_points("6").is_err());
        assert!(parse_points("two").is_err());
    }

    #[test]
    fn rate_accepts_negative_points() {
        let cli = Cli::try_parse_from(["politician", "rate", "-n", "ana", "-r", "-3"]).unwrap();
        match cli.command {
            Command::Rate { points, party, .. } => {
                assert_eq!(points, -3);
                assert_eq!(party, None);
            }
            _ => panic!("expected rate command"),
        }
    }

    #[test]
    fn search_all_flags_parse() {
        let cli = Cli::try_parse_from(["politician", "search", "all", "-r", "-f", "--json"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Search {
                target: SearchTarget::All { reverse, full },
            } => {
                assert!(reverse);
                assert!(full);
            }
            _ => panic!("expected search all"),
        }
    }

    #[test]
    fn out_of_range_points_fail_at_parse_time() {
        assert!(Cli::try_parse_from(["politician", "rate", "-n", "ana", "-r", "9"]).is_err());
    }
}
