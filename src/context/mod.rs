//! Library-wide defaults shared by every module of one project tree.

use tracing::{debug, trace};

use crate::config::merge::{compose_module, merge_module};
use crate::config::{ConfigError, ModuleConfiguration};
use crate::dsl::ModuleBuilder;
use crate::resolve::{resolve_module, ResolvedModule};

/// Identity and tooling settings of a library. Carried through to every
/// resolved module; the engine does not interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub build_tool_version: Option<String>,
    pub include_unstable_dependency_updates: bool,
}

/// The library declaration: identity plus the defaults every module
/// declaration is merged on top of.
///
/// Built once per project tree and read-only afterwards. Pass it by
/// reference to each module resolution.
///
/// ## Example
///
/// ```
/// use module_compose::LibraryContext;
/// use module_compose::dsl::prelude::*;
///
/// let library = LibraryContext::builder("fluid-json", "1.4.0")
///     .all_modules(|m| {
///         m.language(|l| {
///             l.with_experimental_api("kotlin.RequiresOptIn");
///         });
///     })
///     .build()?;
///
/// let module = library.module("JSON core", |m| {
///     m.targets(|t| {
///         t.jvm(|jvm| {
///             jvm.dependencies(|d| {
///                 d.api("org.example:parser:2.0");
///             });
///         });
///     });
/// })?;
///
/// assert_eq!(module.targets().len(), 2);
/// # Ok::<(), module_compose::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct LibraryContext {
    info: LibraryInfo,
    defaults: ModuleConfiguration,
}

impl LibraryContext {
    /// Creates a new builder for a library declaration.
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> LibraryBuilder {
        LibraryBuilder {
            name: name.into(),
            version: version.into(),
            build_tool_version: None,
            include_unstable_dependency_updates: false,
            defaults: None,
            error: None,
        }
    }

    pub fn info(&self) -> &LibraryInfo {
        &self.info
    }

    /// The merged `all_modules` blocks.
    pub fn defaults(&self) -> &ModuleConfiguration {
        &self.defaults
    }

    /// Merges a module declaration on top of the library defaults.
    ///
    /// Target kinds only the defaults declare are not inherited.
    pub fn merge(&self, declaration: &ModuleConfiguration) -> Result<ModuleConfiguration, ConfigError> {
        merge_module(&self.defaults, declaration, false)
    }

    /// Merges `declaration` on top of the defaults and resolves the result.
    pub fn resolve(&self, declaration: &ModuleConfiguration) -> Result<ResolvedModule, ConfigError> {
        let merged = self.merge(declaration)?;
        resolve_module(&self.info, merged)
    }

    /// Declares, merges and resolves one module.
    pub fn module(
        &self,
        description: impl Into<String>,
        configure: impl FnOnce(&mut ModuleBuilder),
    ) -> Result<ResolvedModule, ConfigError> {
        let mut builder = ModuleBuilder::new(Some(description.into()));
        configure(&mut builder);
        self.resolve(&builder.build()?)
    }
}

/// Builder for a [`LibraryContext`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct LibraryBuilder {
    name: String,
    version: String,
    build_tool_version: Option<String>,
    include_unstable_dependency_updates: bool,
    defaults: Option<ModuleConfiguration>,
    error: Option<ConfigError>,
}

impl LibraryBuilder {
    /// Adds defaults applied to every module of the library.
    ///
    /// Repeated blocks compose; every target kind they declare is kept.
    pub fn all_modules(mut self, configure: impl FnOnce(&mut ModuleBuilder)) -> Self {
        let mut builder = ModuleBuilder::new(None);
        configure(&mut builder);

        let merged = builder.build().and_then(|next| match self.defaults.take() {
            Some(previous) => compose_module(&previous, &next),
            None => Ok(next),
        });
        match merged {
            Ok(defaults) => {
                trace!(
                    kinds = ?defaults.targets().kinds().collect::<Vec<_>>(),
                    "folded all_modules block"
                );
                self.defaults = Some(defaults);
            }
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
        self
    }

    /// Pins the build tool version recorded for the library.
    pub fn build_tool_version(mut self, version: impl Into<String>) -> Self {
        self.build_tool_version = Some(version.into());
        self
    }

    /// Lets dependency-update reports suggest unstable versions.
    pub fn include_unstable_dependency_updates(mut self) -> Self {
        self.include_unstable_dependency_updates = true;
        self
    }

    /// Builds the `LibraryContext`.
    ///
    /// Returns an error if the name or version is empty, or if an
    /// `all_modules` block failed.
    pub fn build(self) -> Result<LibraryContext, ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.version.is_empty() {
            return Err(ConfigError::EmptyVersion);
        }
        if let Some(error) = self.error {
            return Err(error);
        }

        Ok(LibraryContext {
            info: LibraryInfo {
                name: self.name,
                version: self.version,
                build_tool_version: self.build_tool_version,
                include_unstable_dependency_updates: self.include_unstable_dependency_updates,
            },
            defaults: self.defaults.unwrap_or_default(),
        })
    }
}

/// One configuration pass over a project tree.
///
/// Holds the single library declaration; a second registration is an error.
#[derive(Debug, Default)]
pub struct ConfigurationPass {
    library: Option<LibraryContext>,
}

impl ConfigurationPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the library declaration for this pass.
    pub fn register(&mut self, library: LibraryContext) -> Result<&LibraryContext, ConfigError> {
        if self.library.is_some() {
            return Err(ConfigError::DuplicateLibrary);
        }
        debug!(
            name = %library.info.name,
            version = %library.info.version,
            "registered library"
        );
        Ok(self.library.insert(library))
    }

    /// Builds and registers a library declaration.
    pub fn declare_library(
        &mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        configure: impl FnOnce(LibraryBuilder) -> LibraryBuilder,
    ) -> Result<&LibraryContext, ConfigError> {
        if self.library.is_some() {
            return Err(ConfigError::DuplicateLibrary);
        }
        let library = configure(LibraryContext::builder(name, version)).build()?;
        self.register(library)
    }

    pub fn library(&self) -> Result<&LibraryContext, ConfigError> {
        self.library.as_ref().ok_or(ConfigError::MissingLibrary)
    }

    /// Declares and resolves a module against the registered library.
    pub fn declare_module(
        &self,
        description: impl Into<String>,
        configure: impl FnOnce(&mut ModuleBuilder),
    ) -> Result<ResolvedModule, ConfigError> {
        self.library()?.module(description, configure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetKind;
    use crate::dsl::prelude::*;

    #[test]
    fn test_empty_name_and_version_rejected() {
        assert_eq!(
            LibraryContext::builder("", "1.0").build().unwrap_err(),
            ConfigError::EmptyName
        );
        assert_eq!(
            LibraryContext::builder("lib", "").build().unwrap_err(),
            ConfigError::EmptyVersion
        );
    }

    #[test]
    fn test_all_modules_blocks_compose() {
        let library = LibraryContext::builder("lib", "1.0")
            .all_modules(|m| {
                m.targets(|t| {
                    t.jvm(|_| {});
                });
            })
            .all_modules(|m| {
                m.targets(|t| {
                    t.js(|_| {});
                });
            })
            .build()
            .unwrap();

        assert_eq!(
            library.defaults().targets().kinds().collect::<Vec<_>>(),
            vec![TargetKind::Common, TargetKind::Jvm, TargetKind::Js]
        );
    }

    #[test]
    fn test_module_does_not_inherit_undeclared_kinds() {
        let library = LibraryContext::builder("lib", "1.0")
            .all_modules(|m| {
                m.targets(|t| {
                    t.jvm(|jvm| {
                        jvm.dependencies(|d| {
                            d.implementation("shared:jvm:1");
                        });
                    });
                    t.js(|_| {});
                });
            })
            .build()
            .unwrap();

        let module = library
            .module("only jvm", |m| {
                m.targets(|t| {
                    t.jvm(|jvm| {
                        jvm.dependencies(|d| {
                            d.implementation("own:jvm:1");
                        });
                    });
                });
            })
            .unwrap();

        let merged = module.configuration();
        assert!(merged.targets().js().is_none());
        let jvm = merged.targets().jvm().unwrap();
        assert_eq!(jvm.base.dependencies().regular().len(), 2);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut pass = ConfigurationPass::new();
        assert_eq!(pass.library().unwrap_err(), ConfigError::MissingLibrary);

        pass.declare_library("lib", "1.0", |l| l).unwrap();
        let second = LibraryContext::builder("other", "2.0").build().unwrap();
        assert_eq!(pass.register(second).unwrap_err(), ConfigError::DuplicateLibrary);
        assert_eq!(
            pass.declare_library("lib", "1.0", |l| l).unwrap_err(),
            ConfigError::DuplicateLibrary
        );
        assert_eq!(pass.library().unwrap().info().name, "lib");
    }

    #[test]
    fn test_declare_module_requires_library() {
        let pass = ConfigurationPass::new();
        let result = pass.declare_module("orphan", |_| {});
        assert!(matches!(result, Err(ConfigError::MissingLibrary)));
    }
}
