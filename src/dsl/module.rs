use tracing::trace;

use super::language::LanguageBuilder;
use super::target::TargetsBuilder;
use crate::config::merge::{merge_language, merge_targets};
use crate::config::{
    ConfigError, Hook, Language, ModuleConfiguration, ProjectHook, TargetConfiguration,
    TargetKind, Targets,
};
use crate::host::ProjectHost;

/// Accumulates one module declaration, or the library-wide `all_modules` block.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ModuleBuilder {
    description: Option<String>,
    publishing_enabled: bool,
    publish_single_target_as_module: bool,
    language: Option<Language>,
    targets: Option<Targets>,
    custom_hooks: Vec<ProjectHook>,
    error: Option<ConfigError>,
}

impl ModuleBuilder {
    pub fn new(description: Option<String>) -> Self {
        Self {
            description,
            publishing_enabled: true,
            publish_single_target_as_module: false,
            language: None,
            targets: None,
            custom_hooks: Vec::new(),
            error: None,
        }
    }

    /// Snapshots the declaration.
    ///
    /// The common target is always present, even if never declared.
    /// Returns the first error hit while folding blocks.
    pub fn build(self) -> Result<ModuleConfiguration, ConfigError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut targets = self.targets.unwrap_or_default();
        if !targets.contains(TargetKind::Common) {
            targets.insert(TargetConfiguration::empty(TargetKind::Common));
        }

        Ok(ModuleConfiguration {
            description: self.description,
            publishing_enabled: self.publishing_enabled,
            publish_single_target_as_module: self.publish_single_target_as_module,
            language: self.language.unwrap_or_default(),
            targets,
            custom_hooks: self.custom_hooks,
        })
    }

    pub fn custom(
        &mut self,
        configure: impl Fn(&mut (dyn ProjectHost + 'static)) + Send + Sync + 'static,
    ) -> &mut Self {
        self.custom_hooks.push(Hook::new(configure));
        self
    }

    pub fn language(&mut self, configure: impl FnOnce(&mut LanguageBuilder)) -> &mut Self {
        let mut builder = LanguageBuilder::default();
        configure(&mut builder);
        let next = builder.build();

        let language = match self.language.take() {
            Some(previous) => merge_language(&previous, &next),
            None => next,
        };
        trace!(
            apis = language.experimental_apis().len(),
            features = language.language_features().len(),
            "folded language block"
        );
        self.language = Some(language);
        self
    }

    /// Publishes the only non-common target under the module's own name.
    ///
    /// Checked at resolution: the module must end up with exactly one target.
    pub fn publish_single_target_as_module(&mut self) -> &mut Self {
        self.publish_single_target_as_module = true;
        self
    }

    /// Adds a `targets { ... }` block. Blocks compose, every declared kind is kept.
    pub fn targets(&mut self, configure: impl FnOnce(&mut TargetsBuilder)) -> &mut Self {
        let mut builder = TargetsBuilder::default();
        configure(&mut builder);
        let next = builder.build();

        let merged = match self.targets.take() {
            Some(previous) => merge_targets(&previous, &next, true),
            None => Ok(next),
        };
        match merged {
            Ok(targets) => {
                trace!(kinds = ?targets.kinds().collect::<Vec<_>>(), "folded targets block");
                self.targets = Some(targets);
            }
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
        self
    }

    pub fn without_publishing(&mut self) -> &mut Self {
        self.publishing_enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::prelude::*;

    #[test]
    fn test_separate_targets_blocks_compose() {
        let mut builder = ModuleBuilder::new(Some("demo".into()));
        builder
            .targets(|t| {
                t.jvm(|_| {});
            })
            .targets(|t| {
                t.js(|js| {
                    js.without_browser();
                });
            });
        let module = builder.build().unwrap();

        assert_eq!(
            module.targets().kinds().collect::<Vec<_>>(),
            vec![TargetKind::Common, TargetKind::Jvm, TargetKind::Js]
        );
        assert!(module.targets().js().unwrap().disable_browser_output());
    }

    #[test]
    fn test_language_blocks_union() {
        let mut builder = ModuleBuilder::new(None);
        builder
            .language(|l| {
                l.with_experimental_api("a");
            })
            .language(|l| {
                l.with_experimental_api("b").version("2.0");
            });
        let module = builder.build().unwrap();

        assert_eq!(module.language().experimental_apis().len(), 2);
        assert_eq!(module.language().version_override(), Some("2.0"));
    }

    #[test]
    fn test_without_publishing_is_sticky() {
        let mut builder = ModuleBuilder::new(None);
        builder.without_publishing().publish_single_target_as_module();
        let module = builder.build().unwrap();

        assert!(!module.publishing_enabled());
        assert!(module.publish_single_target_as_module());
    }

    #[test]
    fn test_common_is_implicit() {
        let module = ModuleBuilder::new(None).build().unwrap();
        assert!(module.targets().common().is_some());

        let mut builder = ModuleBuilder::new(None);
        builder.targets(|t| {
            t.common(|c| {
                c.dependencies(|d| {
                    d.api("x:y:1");
                });
            });
        });
        let module = builder.build().unwrap();
        let common = module.targets().common().unwrap();
        assert_eq!(common.base.dependencies().regular().len(), 1);
    }
}
