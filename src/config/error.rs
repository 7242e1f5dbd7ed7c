use thiserror::Error;

use super::TargetKind;

/// Errors raised while declaring, merging or resolving a module configuration.
///
/// Every variant is fatal to the configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("library name must not be empty")]
    EmptyName,

    #[error("library version must not be empty")]
    EmptyVersion,

    #[error("a library has already been declared for this project tree")]
    DuplicateLibrary,

    #[error("no library has been declared for this project tree")]
    MissingLibrary,

    #[error("cannot merge a '{other}' target into a '{base}' target")]
    KindMismatch { base: TargetKind, other: TargetKind },

    #[error(
        "publishing a single target as module requires exactly one target, found {count}: {targets:?}"
    )]
    SingleTargetPublication { count: usize, targets: Vec<String> },

    #[error("target '{target}' declares {dependency} dependencies but {prerequisite} was never enabled")]
    MissingPrerequisite {
        target: TargetKind,
        dependency: &'static str,
        prerequisite: &'static str,
    },

    #[error("target '{target}' does not support {category} dependencies")]
    UnsupportedDependencyCategory {
        target: TargetKind,
        category: &'static str,
    },

    #[error("unknown target kind: {0}")]
    UnknownTargetKind(String),

    #[error("unknown architecture: {0}")]
    UnknownArchitecture(String),

    #[error("unknown compiler mode: {0}")]
    UnknownCompilerMode(String),
}
