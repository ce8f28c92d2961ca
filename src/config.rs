//! Configuration file support.
//!
//! Settings come from four layers, highest first: command-line flags,
//! `DDB_*` environment variables, the TOML config file, built-in defaults.
//! Flags and environment variables are merged by clap before they get here.

use crate::error::{Error, Result};

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = ".ddb.toml";

/// Contents of the TOML config file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Table spec used when none is given on the command line.
    pub table: Option<String>,
    /// Pretty-print records.
    pub pretty: Option<bool>,
    /// Colour records.
    pub color: Option<bool>,
    /// Debug-level logging.
    pub verbose: Option<bool>,
    /// Custom store endpoint, e.g. a local DynamoDB.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: Option<String>,
}

impl FileConfig {
    /// `~/.ddb.toml`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(FILE_NAME))
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|error| config_error(path, error))?;
        toml::from_str(&content).map_err(|error| config_error(path, error))
    }

    /// Load the explicitly named file, or the default file if it exists.
    ///
    /// A missing default file yields an empty config; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }
}

fn config_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::Config {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Values taken from flags and environment variables.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Overrides {
    /// `--table` / `DDB_TABLE`.
    pub table: Option<String>,
    /// `--pretty` / `DDB_PRETTY`.
    pub pretty: Option<bool>,
    /// `--color` / `DDB_COLOR`.
    pub color: Option<bool>,
    /// `--verbose` / `DDB_VERBOSE`.
    pub verbose: bool,
    /// `--endpoint-url` / `DDB_ENDPOINT_URL`.
    pub endpoint_url: Option<String>,
    /// `--region` / `DDB_REGION`.
    pub region: Option<String>,
}

/// Effective settings for one invocation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    /// Legacy single-table mode.
    pub table: Option<String>,
    /// Pretty-print records.
    pub pretty: bool,
    /// Colour records.
    pub color: bool,
    /// Debug-level logging.
    pub verbose: bool,
    /// Custom store endpoint.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: Option<String>,
}

impl Settings {
    /// Layer the overrides over the file; `pretty` and `color` fall back to
    /// whether stdout is a terminal.
    pub fn resolve(overrides: Overrides, file: FileConfig, is_terminal: bool) -> Self {
        Self {
            table: overrides.table.or(file.table),
            pretty: overrides.pretty.or(file.pretty).unwrap_or(is_terminal),
            color: overrides.color.or(file.color).unwrap_or(is_terminal),
            verbose: overrides.verbose || file.verbose.unwrap_or(false),
            endpoint_url: overrides.endpoint_url.or(file.endpoint_url),
            region: overrides.region.or(file.region),
        }
    }
}
