//! Seams implemented by the external project-setup collaborator.
//!
//! The engine never touches a build graph itself. Deferred dependency
//! operations and custom hooks are replayed against these handles by
//! whoever consumes a [`ResolvedModule`](crate::ResolvedModule).

use std::any::Any;

use crate::config::Notation;

/// Receives dependency additions for one source root.
pub trait DependencyHandler {
    /// Adds `notation` to the named host configuration (`"api"`, `"kapt"`, ...).
    fn add(&mut self, configuration: &str, notation: &Notation);
}

/// Receives language settings for one source root.
pub trait LanguageSettingsHost {
    fn opt_in(&mut self, api: &str);

    fn enable_language_feature(&mut self, feature: &str);

    fn set_language_version(&mut self, version: &str);
}

/// A compilation target created by the host for a resolved target kind.
pub trait TargetHost {
    /// Host-side target name, e.g. `jvm` or `iosArm64`.
    fn name(&self) -> &str;

    /// Escape hatch so hooks can reach the concrete host type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The host project a module declaration is applied to.
pub trait ProjectHost {
    fn name(&self) -> &str;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
