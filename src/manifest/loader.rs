use std::path::Path;

use serde::de::DeserializeOwned;

use super::env::EnvSource;
use super::file::{FileSource, InlineSource};
use super::reference::resolve_references;
use super::schema::{LibraryManifest, ModuleManifest};
use super::source::{merge_at_path, ManifestSource};
use super::ManifestError;
use crate::config::ModuleConfiguration;
use crate::context::LibraryContext;

/// Builder for loading a manifest from layered TOML sources.
///
/// Sources are merged in registration order, with later sources overriding
/// earlier ones. Nested tables are merged recursively; other values
/// (including arrays, so dependency lists) are replaced entirely.
///
/// ## Variable References
///
/// String values can reference other values using `${path.to.field}`:
///
/// ```toml
/// [library]
/// name = "fluid-json"
/// version = "1.4.0"
///
/// [all_modules.targets.jvm]
/// dependencies = [{ api = "org.example:fluid-core:${library.version}" }]
/// ```
///
/// Use `$$` to escape a literal `$` (e.g., `$${VAR}` becomes `${VAR}`).
///
/// ## Example
///
/// ```no_run
/// use module_compose::manifest::ManifestLoader;
///
/// let library = ManifestLoader::builder()
///     .with_file("library.toml", true)
///     .with_file("library.local.toml", false)
///     .with_env("MODCOMP", "__")
///     .load_library()?;
/// # Ok::<(), module_compose::manifest::ManifestError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until a load method is called"]
pub struct ManifestLoader {
    sources: Vec<Box<dyn ManifestSource>>,
}

impl ManifestLoader {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file. A missing required file fails the load; a missing
    /// optional one is skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds TOML text. `name` identifies it in parse errors.
    pub fn with_str(self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.with_source(InlineSource::new(name, contents))
    }

    /// Adds environment variables starting with `prefix` followed by `separator`.
    ///
    /// `MODCOMP__LIBRARY__VERSION=1.4.0` with prefix `MODCOMP` and separator
    /// `__` sets `library.version`. See [`EnvSource`] for value coercion.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    pub fn with_source(mut self, source: impl ManifestSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Merges every source, resolves references and deserializes the result.
    pub fn load<T: DeserializeOwned>(self) -> Result<T, ManifestError> {
        let mut merged = toml::Table::new();

        for source in &self.sources {
            for entry in source.entries()? {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        resolve_references(&mut merged)?;

        let value = toml::Value::Table(merged);
        value.try_into().map_err(ManifestError::DeserializeError)
    }

    /// Loads a [`LibraryManifest`] and builds its context.
    pub fn load_library(self) -> Result<LibraryContext, ManifestError> {
        self.load::<LibraryManifest>()?.into_library_context()
    }

    /// Loads a [`ModuleManifest`] and builds the module declaration.
    pub fn load_module(self) -> Result<ModuleConfiguration, ManifestError> {
        self.load::<ModuleManifest>()?.into_module_configuration()
    }
}
