use crate::config::schema::{OutlineConfig, ValidationError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a settings document could not be turned into an [`OutlineConfig`].
///
/// `path` is `None` for documents handed over as a string.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: malformed TOML: {source}", origin(.path))]
    Malformed {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("{}: {source}", origin(.path))]
    Rejected {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    /// Settings file the error refers to, if it came from one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } => Some(path),
            ConfigError::Malformed { path, .. } | ConfigError::Rejected { path, .. } => {
                path.as_deref()
            }
        }
    }
}

fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "inline settings".to_string(),
    }
}

pub fn load_from_str(input: &str) -> Result<OutlineConfig, ConfigError> {
    parse_document(input, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<OutlineConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&contents, Some(path))
}

fn parse_document(input: &str, path: Option<&Path>) -> Result<OutlineConfig, ConfigError> {
    let config: OutlineConfig =
        toml_edit::de::from_str(input).map_err(|source| ConfigError::Malformed {
            path: path.map(Path::to_path_buf),
            source,
        })?;
    config.validate().map_err(|source| ConfigError::Rejected {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    Ok(config)
}
