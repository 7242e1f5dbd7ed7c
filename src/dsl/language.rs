use std::collections::BTreeSet;

use crate::config::{Hook, Language, LanguageHook};
use crate::host::LanguageSettingsHost;

/// Accumulates one `language { ... }` block.
#[derive(Debug, Default)]
pub struct LanguageBuilder {
    experimental_apis: BTreeSet<String>,
    language_features: BTreeSet<String>,
    no_explicit_api: bool,
    version_override: Option<String>,
    custom_hooks: Vec<LanguageHook>,
}

impl LanguageBuilder {
    pub(crate) fn build(self) -> Language {
        Language {
            experimental_apis: self.experimental_apis,
            language_features: self.language_features,
            no_explicit_api: self.no_explicit_api,
            version_override: self.version_override,
            custom_hooks: self.custom_hooks,
        }
    }

    /// Opts in to an experimental API by its marker annotation.
    pub fn with_experimental_api(&mut self, name: impl Into<String>) -> &mut Self {
        self.experimental_apis.insert(name.into());
        self
    }

    pub fn with_language_feature(&mut self, name: impl Into<String>) -> &mut Self {
        self.language_features.insert(name.into());
        self
    }

    pub fn without_explicit_api(&mut self) -> &mut Self {
        self.no_explicit_api = true;
        self
    }

    /// Overrides the language version. The last call wins.
    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version_override = Some(version.into());
        self
    }

    pub fn custom(
        &mut self,
        configure: impl Fn(&mut (dyn LanguageSettingsHost + 'static)) + Send + Sync + 'static,
    ) -> &mut Self {
        self.custom_hooks.push(Hook::new(configure));
        self
    }
}
