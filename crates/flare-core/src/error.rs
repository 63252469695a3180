//! Error types for Flare

use thiserror::Error;

/// Everything that can go wrong in the effect layers and their tooling
#[derive(Debug, Error)]
pub enum FlareError {
    #[error("no entity {0}")]
    EntityNotFound(String),

    #[error("an entity named '{0}' already exists")]
    DuplicateEntityName(String),

    #[error("cannot parse {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    ConfigError(String),

    #[error("audio: {0}")]
    AudioError(String),

    #[error("runtime: {0}")]
    RuntimeError(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("malformed TOML: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("cannot write TOML: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, FlareError>;
