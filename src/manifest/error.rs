use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ConfigError, TargetKind};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ManifestError {
    #[error("required manifest not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read manifest '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse inline manifest '{name}': {source}")]
    InlineParseError {
        name: String,
        source: toml::de::Error,
    },

    #[error("failed to deserialize manifest: {0}")]
    DeserializeError(#[from] toml::de::Error),

    #[error("environment separator must not be empty")]
    EmptyEnvSeparator,

    #[error("circular reference detected at '{0}'")]
    CircularReference(String),

    #[error("referenced path not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid reference path: {0}")]
    InvalidReferencePath(String),

    #[error("cannot reference non-scalar value: {0}")]
    NonScalarReference(String),

    #[error("unclosed reference (missing '}}')")]
    UnclosedReference,

    #[error("target '{target}' does not accept option '{option}'")]
    UnsupportedOption {
        target: TargetKind,
        option: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
