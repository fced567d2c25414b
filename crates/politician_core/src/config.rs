//! Storage location resolution.
//!
//! # Responsibility
//! - Decide where the database file and log directory live.
//!
//! # Invariants
//! - Resolved paths are absolute.
//! - Resolution never touches the filesystem; creating directories is the
//!   caller's job.

use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "data.db";
/// Data directory relative to `$HOME`.
pub const DATA_DIR_FROM_HOME: &str = ".local/share/politician";
/// Log directory name next to the database file.
pub const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    HomeNotSet,
    EmptyPath,
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeNotSet => write!(f, "HOME environment variable not set"),
            Self::EmptyPath => write!(f, "database path cannot be empty"),
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::HomeNotSet | Self::EmptyPath => None,
        }
    }
}

/// Resolved on-disk locations for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

impl StoreConfig {
    /// Resolves locations from an explicit path or `$HOME`.
    ///
    /// An explicit path wins; otherwise `$HOME/.local/share/politician/data.db`.
    pub fn resolve(explicit_db_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::resolve_with_home(explicit_db_path, std::env::var_os("HOME"))
    }

    fn resolve_with_home(
        explicit_db_path: Option<PathBuf>,
        home: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let db_path = match explicit_db_path {
            Some(path) if path.as_os_str().is_empty() => return Err(ConfigError::EmptyPath),
            Some(path) => absolutize(path)?,
            None => {
                let home = home
                    .filter(|value| !value.is_empty())
                    .ok_or(ConfigError::HomeNotSet)?;
                absolutize(
                    PathBuf::from(home)
                        .join(DATA_DIR_FROM_HOME)
                        .join(DB_FILE_NAME),
                )?
            }
        };
        let log_dir = data_dir_of(&db_path).join(LOG_DIR_NAME);
        Ok(Self { db_path, log_dir })
    }

    /// Directory holding the database file.
    pub fn data_dir(&self) -> &Path {
        data_dir_of(&self.db_path)
    }
}

fn data_dir_of(db_path: &Path) -> &Path {
    db_path.parent().unwrap_or(db_path)
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
