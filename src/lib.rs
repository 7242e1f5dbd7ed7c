//! Declarative multi-target module configuration.
//!
//! A library declares defaults once; each module declares only what
//! differs. [`LibraryContext`] merges the two and resolves the result into
//! per-target settings and source-root layouts for the host build tool.

pub mod config;
pub mod context;
pub mod dsl;
mod error;
pub mod host;
pub mod manifest;
pub mod resolve;

pub use config::{ConfigError, ModuleConfiguration, TargetKind};
pub use context::{ConfigurationPass, LibraryBuilder, LibraryContext, LibraryInfo};
pub use error::Error;
pub use manifest::{ManifestError, ManifestLoader};
pub use resolve::{ResolvedModule, ResolvedTarget, SourceSetLayout, TargetSettings};
