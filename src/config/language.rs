use std::collections::BTreeSet;

use super::LanguageHook;
use crate::host::LanguageSettingsHost;

/// Compiler language settings applied to every source root of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Language {
    pub(crate) experimental_apis: BTreeSet<String>,
    pub(crate) language_features: BTreeSet<String>,
    pub(crate) no_explicit_api: bool,
    pub(crate) version_override: Option<String>,
    pub(crate) custom_hooks: Vec<LanguageHook>,
}

impl Language {
    pub fn experimental_apis(&self) -> &BTreeSet<String> {
        &self.experimental_apis
    }

    pub fn language_features(&self) -> &BTreeSet<String> {
        &self.language_features
    }

    pub fn no_explicit_api(&self) -> bool {
        self.no_explicit_api
    }

    /// Explicit API mode is on unless some declaration opted out.
    pub fn explicit_api(&self) -> bool {
        !self.no_explicit_api
    }

    pub fn version_override(&self) -> Option<&str> {
        self.version_override.as_deref()
    }

    pub fn custom_hooks(&self) -> &[LanguageHook] {
        &self.custom_hooks
    }

    /// Pushes these settings into a host source root, hooks last.
    pub fn apply<H: LanguageSettingsHost + 'static>(&self, host: &mut H) {
        for api in &self.experimental_apis {
            host.opt_in(api);
        }
        for feature in &self.language_features {
            host.enable_language_feature(feature);
        }
        if let Some(version) = &self.version_override {
            host.set_language_version(version);
        }
        for hook in &self.custom_hooks {
            hook.call(host);
        }
    }
}
