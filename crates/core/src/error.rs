//! Error types shared by the core and the backend

use crate::models::Difficulty;
use thiserror::Error;

/// Failure to load or parse the static hint registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("hint registry not found at {path}: {source}")]
    Missing {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in hint registry: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid hint registry structure: missing or invalid \"hints\" key")]
    MissingHintsKey,

    #[error("unknown difficulty in hint registry: {0}")]
    UnknownDifficulty(String),
}

impl RegistryError {
    pub(crate) fn missing(path: &std::path::Path, source: std::io::Error) -> Self {
        RegistryError::Missing {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Failure while selecting hints or resolving their data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HintError {
    #[error("unknown data key: {0}")]
    UnknownKey(String),

    #[error("no hints found for difficulty level: {0}")]
    NoHintsForDifficulty(Difficulty),
}

/// Failure to turn user input into a numeric Steam ID.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("no Steam identifier provided")]
    Empty,

    #[error("not a numeric Steam ID: {0}")]
    NotNumeric(String),

    #[error("custom ID could not be resolved: {0}")]
    NotFound(String),
}
