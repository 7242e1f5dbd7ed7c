//! Declarative library and module manifests loaded from TOML.

mod env;
mod error;
mod file;
mod loader;
mod reference;
mod schema;
mod source;

pub use env::EnvSource;
pub use error::ManifestError;
pub use file::{FileSource, InlineSource};
pub use loader::ManifestLoader;
pub use schema::{
    LanguageManifest, LibraryManifest, LibrarySection, ManifestDependency, ManifestNotation,
    ModuleManifest, TargetManifest,
};
pub use source::{ManifestEntry, ManifestSource};
