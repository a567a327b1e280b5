use crate::errors::{FileOperation, IoError};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "mks.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(mks::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(mks::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `mks.toml`. Every field is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory the structure is created under.
    pub destination: PathBuf,
    pub verbose: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("."),
            verbose: false,
        }
    }
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })
    }

    /// Loads `mks.toml` from `directory`, falling back to defaults when there is none.
    pub fn load_from<P: AsRef<Path>>(directory: P) -> Result<Self, ConfigError> {
        let path = directory.as_ref().join(CONFIG_FILE_NAME);

        if !path.exists() {
            log::debug!("no {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        log::debug!("loading config from {}", path.display());

        Self::from_file(path)
    }
}
