//! Immutable configuration entities and the merge engine that folds them.

mod dependencies;
mod error;
mod hook;
mod language;
pub mod merge;
mod module;
mod target;

pub use dependencies::{Dependencies, DependencyOp, DependencyScope, Notation};
pub use error::ConfigError;
pub use hook::Hook;
pub(crate) use hook::run_all;
pub use language::Language;
pub use module::{ModuleConfiguration, Targets};
pub use target::{
    CommonTarget, DarwinArch, DarwinTarget, JsCompiler, JsTarget, JvmTarget, TargetBase,
    TargetConfiguration, TargetKind,
};

use crate::host::{DependencyHandler, LanguageSettingsHost, ProjectHost, TargetHost};

/// Custom dependency operation.
pub type DependencyHook = Hook<dyn DependencyHandler>;
/// Custom language-settings operation.
pub type LanguageHook = Hook<dyn LanguageSettingsHost>;
/// Custom operation on a host compilation target.
pub type TargetHook = Hook<dyn TargetHost>;
/// Custom operation on the host project.
pub type ProjectHook = Hook<dyn ProjectHost>;
