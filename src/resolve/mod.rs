//! Turns a merged module configuration into what the project-setup
//! collaborator consumes: per-target settings, host target names and
//! source-root layouts.

mod layout;

pub use layout::SourceSetLayout;

use tracing::debug;

use crate::config::{
    run_all, ConfigError, DarwinArch, JsCompiler, ModuleConfiguration, TargetConfiguration,
    TargetKind,
};
use crate::context::LibraryInfo;
use crate::host::{ProjectHost, TargetHost};

/// Kind-specific values derived from a target's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSettings {
    Common,
    Jvm {
        includes_host_language_sources: bool,
        new_compiler_backend: bool,
    },
    Js {
        compiler: JsCompiler,
        browser: bool,
        node_js: bool,
    },
    Darwin {
        architectures: Vec<DarwinArch>,
    },
}

/// One target of a resolved module.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    configuration: TargetConfiguration,
    settings: TargetSettings,
    host_targets: Vec<String>,
    source_sets: Vec<SourceSetLayout>,
}

impl ResolvedTarget {
    pub fn kind(&self) -> TargetKind {
        self.configuration.kind()
    }

    pub fn configuration(&self) -> &TargetConfiguration {
        &self.configuration
    }

    pub fn settings(&self) -> &TargetSettings {
        &self.settings
    }

    /// Host compilation targets this target expands to. Empty for common.
    pub fn host_targets(&self) -> &[String] {
        &self.host_targets
    }

    pub fn source_sets(&self) -> &[SourceSetLayout] {
        &self.source_sets
    }

    /// Runs the target's custom hooks against a host target, in order.
    pub fn run_hooks<T: TargetHost + 'static>(&self, target: &mut T) {
        let target: &mut (dyn TargetHost + 'static) = target;
        run_all(self.configuration.base().custom_hooks(), target);
    }
}

/// A fully merged and validated module, ready to hand off.
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    library: LibraryInfo,
    configuration: ModuleConfiguration,
    targets: Vec<ResolvedTarget>,
    single_target_publication: Option<String>,
}

impl ResolvedModule {
    pub fn library(&self) -> &LibraryInfo {
        &self.library
    }

    pub fn configuration(&self) -> &ModuleConfiguration {
        &self.configuration
    }

    /// The module description, with an empty one treated as absent.
    pub fn description(&self) -> Option<&str> {
        self.configuration.description().filter(|d| !d.is_empty())
    }

    pub fn targets(&self) -> &[ResolvedTarget] {
        &self.targets
    }

    pub fn target(&self, kind: TargetKind) -> Option<&ResolvedTarget> {
        self.targets.iter().find(|t| t.kind() == kind)
    }

    /// Every source root of every target, in resolution order.
    pub fn source_sets(&self) -> impl Iterator<Item = &SourceSetLayout> {
        self.targets.iter().flat_map(|t| t.source_sets())
    }

    /// The host target published under the module's own name, if requested.
    pub fn single_target_publication(&self) -> Option<&str> {
        self.single_target_publication.as_deref()
    }

    /// Runs the module-level custom hooks against the host project.
    pub fn run_hooks<P: ProjectHost + 'static>(&self, project: &mut P) {
        let project: &mut (dyn ProjectHost + 'static) = project;
        run_all(self.configuration.custom_hooks(), project);
    }
}

/// Validates `configuration` and derives everything kind-specific.
///
/// Fails before any source root is computed if a cross-field rule is broken.
pub fn resolve_module(
    library: &LibraryInfo,
    configuration: ModuleConfiguration,
) -> Result<ResolvedModule, ConfigError> {
    validate_dependency_categories(&configuration)?;

    let host_targets: Vec<String> = configuration
        .targets()
        .iter()
        .flat_map(host_target_names)
        .collect();

    let single_target_publication = if configuration.publish_single_target_as_module() {
        match host_targets.as_slice() {
            [only] => Some(only.clone()),
            _ => {
                return Err(ConfigError::SingleTargetPublication {
                    count: host_targets.len(),
                    targets: host_targets,
                })
            }
        }
    } else {
        None
    };

    let targets = configuration
        .targets()
        .iter()
        .filter_map(resolve_target)
        .collect();

    debug!(
        library = %library.name,
        description = configuration.description().unwrap_or_default(),
        host_targets = ?host_targets,
        "resolved module"
    );

    Ok(ResolvedModule {
        library: library.clone(),
        configuration,
        targets,
        single_target_publication,
    })
}

fn validate_dependency_categories(configuration: &ModuleConfiguration) -> Result<(), ConfigError> {
    const CATEGORY: &str = "annotation-processor";

    for target in configuration.targets().iter() {
        let base = target.base();
        let has_special =
            !base.dependencies().special().is_empty() || !base.test_dependencies().special().is_empty();
        if !has_special {
            continue;
        }

        match target {
            TargetConfiguration::Jvm(jvm) if !jvm.includes_host_language_sources() => {
                return Err(ConfigError::MissingPrerequisite {
                    target: TargetKind::Jvm,
                    dependency: CATEGORY,
                    prerequisite: "with_java()",
                });
            }
            TargetConfiguration::Jvm(_) => {}
            TargetConfiguration::Common(_)
            | TargetConfiguration::Js(_)
            | TargetConfiguration::Darwin(_) => {
                return Err(ConfigError::UnsupportedDependencyCategory {
                    target: target.kind(),
                    category: CATEGORY,
                });
            }
        }
    }

    Ok(())
}

fn host_target_names(target: &TargetConfiguration) -> Vec<String> {
    match target {
        TargetConfiguration::Common(_) => Vec::new(),
        TargetConfiguration::Jvm(_) => vec![TargetKind::Jvm.name().to_string()],
        TargetConfiguration::Js(_) => vec![TargetKind::Js.name().to_string()],
        TargetConfiguration::Darwin(darwin) => darwin
            .enabled_architectures()
            .into_iter()
            .map(|arch| arch.target_name().to_string())
            .collect(),
    }
}

fn resolve_target(target: &TargetConfiguration) -> Option<ResolvedTarget> {
    const COMMON: &str = "common";

    let (settings, source_sets) = match target {
        TargetConfiguration::Common(_) => (
            TargetSettings::Common,
            vec![SourceSetLayout::new(COMMON, None, None)],
        ),
        TargetConfiguration::Jvm(jvm) => (
            TargetSettings::Jvm {
                includes_host_language_sources: jvm.includes_host_language_sources(),
                new_compiler_backend: !jvm.disable_new_compiler_backend(),
            },
            vec![SourceSetLayout::new("jvm", Some("jvm"), Some(COMMON))],
        ),
        TargetConfiguration::Js(js) => (
            TargetSettings::Js {
                compiler: js.compiler().unwrap_or(JsCompiler::Ir),
                browser: !js.disable_browser_output(),
                node_js: !js.disable_host_runtime_output(),
            },
            vec![SourceSetLayout::new("js", Some("js"), Some(COMMON))],
        ),
        TargetConfiguration::Darwin(darwin) => {
            let architectures = darwin.enabled_architectures();
            if architectures.is_empty() {
                debug!("every darwin architecture is disabled, skipping target");
                return None;
            }

            let umbrella = TargetKind::Darwin.name();
            let mut source_sets = vec![SourceSetLayout::new(umbrella, Some(umbrella), Some(COMMON))];
            source_sets.extend(architectures.iter().map(|arch| {
                SourceSetLayout::new(arch.target_name(), Some(arch.path_name()), Some(umbrella))
            }));
            (TargetSettings::Darwin { architectures }, source_sets)
        }
    };

    Some(ResolvedTarget {
        configuration: target.clone(),
        settings,
        host_targets: host_target_names(target),
        source_sets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::prelude::*;
    use crate::dsl::ModuleBuilder;

    fn info() -> LibraryInfo {
        LibraryInfo {
            name: "lib".into(),
            version: "1.0".into(),
            build_tool_version: None,
            include_unstable_dependency_updates: false,
        }
    }

    fn declare(configure: impl FnOnce(&mut ModuleBuilder)) -> ModuleConfiguration {
        let mut builder = ModuleBuilder::new(Some("test".into()));
        configure(&mut builder);
        builder.build().unwrap()
    }

    #[test]
    fn test_darwin_layout() {
        let module = declare(|m| {
            m.targets(|t| {
                t.darwin(|d| {
                    d.only(&[DarwinArch::IosArm64, DarwinArch::MacosX64]);
                });
            });
        });
        let resolved = resolve_module(&info(), module).unwrap();
        let darwin = resolved.target(TargetKind::Darwin).unwrap();

        let names: Vec<_> = darwin
            .source_sets()
            .iter()
            .map(|s| (s.name(), s.sources(), s.depends_on()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("darwin", "sources-darwin".to_string(), Some("common")),
                ("iosArm64", "sources-ios-arm64".to_string(), Some("darwin")),
                ("macosX64", "sources-macos-x64".to_string(), Some("darwin")),
            ]
        );
        assert_eq!(darwin.host_targets(), ["iosArm64", "macosX64"]);
    }

    #[test]
    fn test_fully_disabled_darwin_is_skipped() {
        let module = declare(|m| {
            m.targets(|t| {
                t.darwin(|d| {
                    d.only(&[]);
                });
            });
        });
        let resolved = resolve_module(&info(), module).unwrap();
        assert!(resolved.target(TargetKind::Darwin).is_none());
        assert!(resolved.target(TargetKind::Common).is_some());
    }

    #[test]
    fn test_single_target_counts_architectures() {
        let module = declare(|m| {
            m.publish_single_target_as_module().targets(|t| {
                t.darwin(|d| {
                    d.only(&[DarwinArch::IosArm64, DarwinArch::IosX64]);
                });
            });
        });
        let result = resolve_module(&info(), module);
        assert!(matches!(
            result,
            Err(ConfigError::SingleTargetPublication { count: 2, .. })
        ));

        let module = declare(|m| {
            m.publish_single_target_as_module().targets(|t| {
                t.jvm(|_| {});
            });
        });
        let resolved = resolve_module(&info(), module).unwrap();
        assert_eq!(resolved.single_target_publication(), Some("jvm"));
    }

    #[test]
    fn test_single_target_requires_a_target() {
        let module = declare(|m| {
            m.publish_single_target_as_module();
        });
        let result = resolve_module(&info(), module);
        assert!(matches!(
            result,
            Err(ConfigError::SingleTargetPublication { count: 0, .. })
        ));
    }

    #[test]
    fn test_kapt_requires_with_java() {
        let module = declare(|m| {
            m.targets(|t| {
                t.jvm(|jvm| {
                    jvm.dependencies(|d| {
                        d.kapt("com.example:processor:1.0");
                    });
                });
            });
        });
        let result = resolve_module(&info(), module);
        assert!(matches!(
            result,
            Err(ConfigError::MissingPrerequisite {
                target: TargetKind::Jvm,
                ..
            })
        ));

        let module = declare(|m| {
            m.targets(|t| {
                t.jvm(|jvm| {
                    jvm.with_java().dependencies(|d| {
                        d.kapt("com.example:processor:1.0");
                    });
                });
            });
        });
        assert!(resolve_module(&info(), module).is_ok());
    }

    #[test]
    fn test_js_settings_defaults() {
        let module = declare(|m| {
            m.targets(|t| {
                t.js(|js| {
                    js.without_node_js();
                });
            });
        });
        let resolved = resolve_module(&info(), module).unwrap();
        assert_eq!(
            resolved.target(TargetKind::Js).unwrap().settings(),
            &TargetSettings::Js {
                compiler: JsCompiler::Ir,
                browser: true,
                node_js: false,
            }
        );
    }

    #[test]
    fn test_empty_description_is_absent() {
        let mut builder = ModuleBuilder::new(Some(String::new()));
        builder.targets(|_| {});
        let resolved = resolve_module(&info(), builder.build().unwrap()).unwrap();
        assert_eq!(resolved.description(), None);
    }
}
