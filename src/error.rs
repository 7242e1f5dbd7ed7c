use crate::config::ConfigError;
use crate::manifest::ManifestError;
use thiserror::Error;

/// Top-level error type for the module-compose library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}
