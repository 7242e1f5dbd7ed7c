//! Serde shapes of library and module manifests, and how they are applied
//! through the declaration builders.
//!
//! ```toml
//! [library]
//! name = "fluid-json"
//! version = "1.4.0"
//!
//! [all_modules.language]
//! experimental_apis = ["kotlin.RequiresOptIn"]
//!
//! [all_modules.targets.jvm]
//! with_java = true
//! dependencies = [
//!     { api = "org.example:core:${library.version}" },
//!     { kapt = "org.example:processor:1.0" },
//! ]
//!
//! [all_modules.targets.js]
//! compiler = "ir"
//! dependencies = [{ npm = { name = "left-pad", version = "1.3.0" } }]
//! ```
//!
//! Custom hooks have no manifest form; add them through the builders.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::ManifestError;
use crate::config::{ConfigError, DarwinArch, JsCompiler, ModuleConfiguration, Notation, TargetKind};
use crate::context::LibraryContext;
use crate::dsl::prelude::*;
use crate::dsl::{
    DependenciesBuilder, LanguageBuilder, ManagedRuntime, ModuleBuilder, Plain, TargetsBuilder, Web,
};

fn enabled() -> bool {
    true
}

/// A library manifest: identity plus the `all_modules` defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryManifest {
    pub library: LibrarySection,
    #[serde(default)]
    pub all_modules: Option<ModuleManifest>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibrarySection {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub build_tool_version: Option<String>,
    #[serde(default)]
    pub include_unstable_dependency_updates: bool,
}

impl LibraryManifest {
    /// Builds the library context this manifest describes.
    pub fn into_library_context(self) -> Result<LibraryContext, ManifestError> {
        let section = self.library;
        let mut builder = LibraryContext::builder(section.name, section.version);
        if let Some(version) = section.build_tool_version {
            builder = builder.build_tool_version(version);
        }
        if section.include_unstable_dependency_updates {
            builder = builder.include_unstable_dependency_updates();
        }

        if let Some(defaults) = &self.all_modules {
            let mut failure = None;
            builder = builder.all_modules(|m| failure = defaults.apply(m).err());
            if let Some(error) = failure {
                return Err(error);
            }
        }

        Ok(builder.build()?)
    }
}

/// A module declaration, or the `all_modules` block of a library.
///
/// `description` is ignored inside `all_modules`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "enabled")]
    pub publishing: bool,
    #[serde(default)]
    pub publish_single_target_as_module: bool,
    #[serde(default)]
    pub language: Option<LanguageManifest>,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetManifest>,
}

impl ModuleManifest {
    /// Builds the module declaration this manifest describes.
    pub fn into_module_configuration(self) -> Result<ModuleConfiguration, ManifestError> {
        let mut builder = ModuleBuilder::new(self.description.clone());
        self.apply(&mut builder)?;
        Ok(builder.build()?)
    }

    fn apply(&self, module: &mut ModuleBuilder) -> Result<(), ManifestError> {
        if !self.publishing {
            module.without_publishing();
        }
        if self.publish_single_target_as_module {
            module.publish_single_target_as_module();
        }
        if let Some(language) = &self.language {
            module.language(|l| language.apply(l));
        }

        let targets = self
            .targets
            .iter()
            .map(|(kind, target)| kind.parse::<TargetKind>().map(|kind| (kind, target)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut failure = None;
        module.targets(|t| {
            for (kind, target) in targets {
                if let Err(error) = target.apply(kind, t) {
                    failure.get_or_insert(error);
                }
            }
        });
        failure.map_or(Ok(()), Err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageManifest {
    pub experimental_apis: Vec<String>,
    pub language_features: Vec<String>,
    pub explicit_api: Option<bool>,
    pub version: Option<String>,
}

impl LanguageManifest {
    fn apply(&self, language: &mut LanguageBuilder) {
        for api in &self.experimental_apis {
            language.with_experimental_api(api.as_str());
        }
        for feature in &self.language_features {
            language.with_language_feature(feature.as_str());
        }
        if self.explicit_api == Some(false) {
            language.without_explicit_api();
        }
        if let Some(version) = &self.version {
            language.version(version.as_str());
        }
    }
}

/// One `[targets.<kind>]` table. Options not meaningful for the kind are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetManifest {
    pub dependencies: Vec<ManifestDependency>,
    pub test_dependencies: Vec<ManifestDependency>,
    pub enforce_uniform_dependency_version: Option<bool>,
    pub with_java: Option<bool>,
    pub new_compiler_backend: Option<bool>,
    pub compiler: Option<String>,
    pub browser: Option<bool>,
    pub node_js: Option<bool>,
    pub disabled_architectures: Option<Vec<String>>,
}

impl TargetManifest {
    fn check_options(&self, kind: TargetKind) -> Result<(), ManifestError> {
        let options: [(&'static str, bool, &[TargetKind]); 6] = [
            ("with_java", self.with_java.is_some(), &[TargetKind::Jvm]),
            ("new_compiler_backend", self.new_compiler_backend.is_some(), &[TargetKind::Jvm]),
            ("compiler", self.compiler.is_some(), &[TargetKind::Js]),
            ("browser", self.browser.is_some(), &[TargetKind::Js]),
            ("node_js", self.node_js.is_some(), &[TargetKind::Js]),
            (
                "disabled_architectures",
                self.disabled_architectures.is_some(),
                &[TargetKind::Darwin],
            ),
        ];

        match options
            .into_iter()
            .find(|(_, present, kinds)| *present && !kinds.contains(&kind))
        {
            Some((option, ..)) => Err(ManifestError::UnsupportedOption { target: kind, option }),
            None => Ok(()),
        }
    }

    fn apply(&self, kind: TargetKind, targets: &mut TargetsBuilder) -> Result<(), ManifestError> {
        self.check_options(kind)?;

        let mut failure = None;
        match kind {
            TargetKind::Common => {
                targets.common(|t| failure = self.apply_base(kind, t).err());
            }
            TargetKind::Jvm => {
                targets.jvm(|t| {
                    if self.with_java == Some(true) {
                        t.with_java();
                    }
                    if self.new_compiler_backend == Some(false) {
                        t.without_new_compiler_backend();
                    }
                    failure = self.apply_base(kind, t).err();
                });
            }
            TargetKind::Js => {
                let compiler = self
                    .compiler
                    .as_deref()
                    .map(str::parse::<JsCompiler>)
                    .transpose()?;
                targets.js(|t| {
                    if let Some(compiler) = compiler {
                        t.compiler(compiler);
                    }
                    if self.browser == Some(false) {
                        t.without_browser();
                    }
                    if self.node_js == Some(false) {
                        t.without_node_js();
                    }
                    failure = self.apply_base(kind, t).err();
                });
            }
            TargetKind::Darwin => {
                let disabled = self
                    .disabled_architectures
                    .iter()
                    .flatten()
                    .map(|arch| arch.parse::<DarwinArch>())
                    .collect::<Result<Vec<_>, _>>()?;
                targets.darwin(|t| {
                    for arch in disabled {
                        t.without(arch);
                    }
                    failure = self.apply_base(kind, t).err();
                });
            }
        }
        failure.map_or(Ok(()), Err)
    }

    fn apply_base<T>(&self, kind: TargetKind, target: &mut T) -> Result<(), ManifestError>
    where
        T: TargetDsl,
        DependenciesBuilder<T::Capabilities>: DependencySink,
    {
        if self.enforce_uniform_dependency_version == Some(false) {
            target.without_enforcing_uniform_dependency_version();
        }

        let mut failure = None;
        if !self.dependencies.is_empty() {
            target.dependencies(|d| failure = add_all(d, kind, &self.dependencies).err());
        }
        if failure.is_none() && !self.test_dependencies.is_empty() {
            target.test_dependencies(|d| failure = add_all(d, kind, &self.test_dependencies).err());
        }
        failure.map_or(Ok(()), Err)
    }
}

/// One dependency entry: a single-key table naming the scope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestDependency {
    Api(ManifestNotation),
    Implementation(ManifestNotation),
    CompileOnly(ManifestNotation),
    RuntimeOnly(ManifestNotation),
    Kapt(ManifestNotation),
    Npm { name: String, version: String },
}

/// What a manifest dependency points at.
///
/// A bare string is a coordinate; `{ platform = "..." }` and
/// `{ project = "..." }` select the other notations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ManifestNotation {
    Coordinate(String),
    Platform {
        platform: String,
        #[serde(default)]
        version: Option<String>,
    },
    Project {
        project: String,
        #[serde(default)]
        configuration: Option<String>,
    },
}

impl From<&ManifestNotation> for Notation {
    fn from(value: &ManifestNotation) -> Self {
        match value {
            ManifestNotation::Coordinate(c) => Notation::Coordinate(c.clone()),
            ManifestNotation::Platform { platform, version } => Notation::Platform {
                module: platform.clone(),
                version: version.clone(),
            },
            ManifestNotation::Project {
                project,
                configuration,
            } => Notation::Project {
                path: project.clone(),
                configuration: configuration.clone(),
            },
        }
    }
}

/// Dependency blocks that manifest entries can be added to. Kind-specific
/// categories fail unless the block's flavour supports them.
trait DependencySink: DependenciesDsl + Sized {
    fn annotation_processor(&mut self, kind: TargetKind, _notation: Notation) -> Result<(), ManifestError> {
        Err(ConfigError::UnsupportedDependencyCategory {
            target: kind,
            category: "annotation-processor",
        }
        .into())
    }

    fn package(&mut self, kind: TargetKind, _name: &str, _version: &str) -> Result<(), ManifestError> {
        Err(ConfigError::UnsupportedDependencyCategory {
            target: kind,
            category: "package",
        }
        .into())
    }
}

impl DependencySink for DependenciesBuilder<Plain> {}

impl DependencySink for DependenciesBuilder<ManagedRuntime> {
    fn annotation_processor(&mut self, _kind: TargetKind, notation: Notation) -> Result<(), ManifestError> {
        self.kapt(notation);
        Ok(())
    }
}

impl DependencySink for DependenciesBuilder<Web> {
    fn package(&mut self, _kind: TargetKind, name: &str, version: &str) -> Result<(), ManifestError> {
        self.npm_implementation(name, version);
        Ok(())
    }
}

fn add_all<S: DependencySink>(
    sink: &mut S,
    kind: TargetKind,
    dependencies: &[ManifestDependency],
) -> Result<(), ManifestError> {
    for dependency in dependencies {
        match dependency {
            ManifestDependency::Api(n) => {
                sink.api(Notation::from(n));
            }
            ManifestDependency::Implementation(n) => {
                sink.implementation(Notation::from(n));
            }
            ManifestDependency::CompileOnly(n) => {
                sink.compile_only(Notation::from(n));
            }
            ManifestDependency::RuntimeOnly(n) => {
                sink.runtime_only(Notation::from(n));
            }
            ManifestDependency::Kapt(n) => sink.annotation_processor(kind, Notation::from(n))?,
            ManifestDependency::Npm { name, version } => sink.package(kind, name, version)?,
        }
    }
    Ok(())
}
