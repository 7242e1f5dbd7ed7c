use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::{ConfigError, Dependencies, TargetHook};

/// The kinds of compilation target a module can declare.
///
/// Ordering follows declaration order and decides the order targets are
/// resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetKind {
    /// Platform-independent code shared by every other target.
    Common,
    /// Managed runtime (bytecode VM) target.
    Jvm,
    /// Web/script target.
    Js,
    /// Native target compiled once per Apple architecture.
    Darwin,
}

impl TargetKind {
    pub const ALL: [TargetKind; 4] = [
        TargetKind::Common,
        TargetKind::Jvm,
        TargetKind::Js,
        TargetKind::Darwin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TargetKind::Common => "common",
            TargetKind::Jvm => "jvm",
            TargetKind::Js => "js",
            TargetKind::Darwin => "darwin",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownTargetKind(s.to_string()))
    }
}

/// Architectures a [`DarwinTarget`] compiles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DarwinArch {
    IosArm64,
    IosSimulatorArm64,
    IosX64,
    MacosArm64,
    MacosX64,
    TvosArm64,
    TvosSimulatorArm64,
    TvosX64,
    WatchosArm32,
    WatchosArm64,
    WatchosDeviceArm64,
    WatchosSimulatorArm64,
    WatchosX64,
}

impl DarwinArch {
    pub const ALL: [DarwinArch; 13] = [
        DarwinArch::IosArm64,
        DarwinArch::IosSimulatorArm64,
        DarwinArch::IosX64,
        DarwinArch::MacosArm64,
        DarwinArch::MacosX64,
        DarwinArch::TvosArm64,
        DarwinArch::TvosSimulatorArm64,
        DarwinArch::TvosX64,
        DarwinArch::WatchosArm32,
        DarwinArch::WatchosArm64,
        DarwinArch::WatchosDeviceArm64,
        DarwinArch::WatchosSimulatorArm64,
        DarwinArch::WatchosX64,
    ];

    /// Host-side target name.
    pub fn target_name(self) -> &'static str {
        match self {
            DarwinArch::IosArm64 => "iosArm64",
            DarwinArch::IosSimulatorArm64 => "iosSimulatorArm64",
            DarwinArch::IosX64 => "iosX64",
            DarwinArch::MacosArm64 => "macosArm64",
            DarwinArch::MacosX64 => "macosX64",
            DarwinArch::TvosArm64 => "tvosArm64",
            DarwinArch::TvosSimulatorArm64 => "tvosSimulatorArm64",
            DarwinArch::TvosX64 => "tvosX64",
            DarwinArch::WatchosArm32 => "watchosArm32",
            DarwinArch::WatchosArm64 => "watchosArm64",
            DarwinArch::WatchosDeviceArm64 => "watchosDeviceArm64",
            DarwinArch::WatchosSimulatorArm64 => "watchosSimulatorArm64",
            DarwinArch::WatchosX64 => "watchosX64",
        }
    }

    /// Directory suffix used for this architecture's source roots.
    pub fn path_name(self) -> &'static str {
        match self {
            DarwinArch::IosArm64 => "ios-arm64",
            DarwinArch::IosSimulatorArm64 => "ios-simulator-arm64",
            DarwinArch::IosX64 => "ios-x64",
            DarwinArch::MacosArm64 => "macos-arm64",
            DarwinArch::MacosX64 => "macos-x64",
            DarwinArch::TvosArm64 => "tvos-arm64",
            DarwinArch::TvosSimulatorArm64 => "tvos-simulator-arm64",
            DarwinArch::TvosX64 => "tvos-x64",
            DarwinArch::WatchosArm32 => "watchos-arm32",
            DarwinArch::WatchosArm64 => "watchos-arm64",
            DarwinArch::WatchosDeviceArm64 => "watchos-device-arm64",
            DarwinArch::WatchosSimulatorArm64 => "watchos-simulator-arm64",
            DarwinArch::WatchosX64 => "watchos-x64",
        }
    }
}

impl fmt::Display for DarwinArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_name())
    }
}

impl FromStr for DarwinArch {
    type Err = ConfigError;

    /// Accepts either the target name (`iosArm64`) or the path name (`ios-arm64`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DarwinArch::ALL
            .into_iter()
            .find(|arch| arch.target_name() == s || arch.path_name() == s)
            .ok_or_else(|| ConfigError::UnknownArchitecture(s.to_string()))
    }
}

/// Compiler backend used for a [`JsTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsCompiler {
    Legacy,
    Ir,
    Both,
}

impl JsCompiler {
    pub fn name(self) -> &'static str {
        match self {
            JsCompiler::Legacy => "legacy",
            JsCompiler::Ir => "ir",
            JsCompiler::Both => "both",
        }
    }
}

impl FromStr for JsCompiler {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(JsCompiler::Legacy),
            "ir" => Ok(JsCompiler::Ir),
            "both" => Ok(JsCompiler::Both),
            other => Err(ConfigError::UnknownCompilerMode(other.to_string())),
        }
    }
}

/// Fields every target kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBase {
    pub(crate) dependencies: Dependencies,
    pub(crate) test_dependencies: Dependencies,
    pub(crate) custom_hooks: Vec<TargetHook>,
    pub(crate) enforces_uniform_dependency_version: bool,
}

impl Default for TargetBase {
    fn default() -> Self {
        Self {
            dependencies: Dependencies::default(),
            test_dependencies: Dependencies::default(),
            custom_hooks: Vec::new(),
            enforces_uniform_dependency_version: true,
        }
    }
}

impl TargetBase {
    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn test_dependencies(&self) -> &Dependencies {
        &self.test_dependencies
    }

    pub fn custom_hooks(&self) -> &[TargetHook] {
        &self.custom_hooks
    }

    /// Whether every dependency from the language distribution is pinned
    /// to the compiler's own version.
    pub fn enforces_uniform_dependency_version(&self) -> bool {
        self.enforces_uniform_dependency_version
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonTarget {
    pub(crate) base: TargetBase,
}

impl CommonTarget {
    pub fn base(&self) -> &TargetBase {
        &self.base
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JvmTarget {
    pub(crate) base: TargetBase,
    pub(crate) includes_host_language_sources: bool,
    pub(crate) disable_new_compiler_backend: bool,
}

impl JvmTarget {
    pub fn base(&self) -> &TargetBase {
        &self.base
    }

    pub fn includes_host_language_sources(&self) -> bool {
        self.includes_host_language_sources
    }

    pub fn disable_new_compiler_backend(&self) -> bool {
        self.disable_new_compiler_backend
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsTarget {
    pub(crate) base: TargetBase,
    pub(crate) compiler: Option<JsCompiler>,
    pub(crate) disable_browser_output: bool,
    pub(crate) disable_host_runtime_output: bool,
}

impl JsTarget {
    pub fn base(&self) -> &TargetBase {
        &self.base
    }

    pub fn compiler(&self) -> Option<JsCompiler> {
        self.compiler
    }

    pub fn disable_browser_output(&self) -> bool {
        self.disable_browser_output
    }

    pub fn disable_host_runtime_output(&self) -> bool {
        self.disable_host_runtime_output
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DarwinTarget {
    pub(crate) base: TargetBase,
    pub(crate) disabled_architectures: BTreeSet<DarwinArch>,
}

impl DarwinTarget {
    pub fn base(&self) -> &TargetBase {
        &self.base
    }

    pub fn is_disabled(&self, arch: DarwinArch) -> bool {
        self.disabled_architectures.contains(&arch)
    }

    pub fn disabled_architectures(&self) -> &BTreeSet<DarwinArch> {
        &self.disabled_architectures
    }

    /// Architectures not switched off, in [`DarwinArch::ALL`] order.
    pub fn enabled_architectures(&self) -> Vec<DarwinArch> {
        DarwinArch::ALL
            .into_iter()
            .filter(|arch| !self.is_disabled(*arch))
            .collect()
    }
}

/// Configuration of one target, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetConfiguration {
    Common(CommonTarget),
    Jvm(JvmTarget),
    Js(JsTarget),
    Darwin(DarwinTarget),
}

impl TargetConfiguration {
    /// An empty configuration of the given kind.
    pub fn empty(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Common => TargetConfiguration::Common(CommonTarget::default()),
            TargetKind::Jvm => TargetConfiguration::Jvm(JvmTarget::default()),
            TargetKind::Js => TargetConfiguration::Js(JsTarget::default()),
            TargetKind::Darwin => TargetConfiguration::Darwin(DarwinTarget::default()),
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            TargetConfiguration::Common(_) => TargetKind::Common,
            TargetConfiguration::Jvm(_) => TargetKind::Jvm,
            TargetConfiguration::Js(_) => TargetKind::Js,
            TargetConfiguration::Darwin(_) => TargetKind::Darwin,
        }
    }

    pub fn base(&self) -> &TargetBase {
        match self {
            TargetConfiguration::Common(t) => &t.base,
            TargetConfiguration::Jvm(t) => &t.base,
            TargetConfiguration::Js(t) => &t.base,
            TargetConfiguration::Darwin(t) => &t.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in TargetKind::ALL {
            assert_eq!(kind.name().parse::<TargetKind>(), Ok(kind));
        }
        assert!(matches!(
            "wasm".parse::<TargetKind>(),
            Err(ConfigError::UnknownTargetKind(_))
        ));
    }

    #[test]
    fn test_arch_parses_both_spellings() {
        assert_eq!("iosArm64".parse::<DarwinArch>(), Ok(DarwinArch::IosArm64));
        assert_eq!("ios-arm64".parse::<DarwinArch>(), Ok(DarwinArch::IosArm64));
        assert!(matches!(
            "ios-arm65".parse::<DarwinArch>(),
            Err(ConfigError::UnknownArchitecture(_))
        ));
    }

    #[test]
    fn test_enabled_architectures_is_complement() {
        let darwin = DarwinTarget {
            disabled_architectures: [DarwinArch::IosX64, DarwinArch::WatchosArm32].into(),
            ..DarwinTarget::default()
        };
        let enabled = darwin.enabled_architectures();

        assert_eq!(enabled.len(), DarwinArch::ALL.len() - 2);
        assert!(!enabled.contains(&DarwinArch::IosX64));
        assert!(!enabled.contains(&DarwinArch::WatchosArm32));
        assert_eq!(enabled[0], DarwinArch::IosArm64);
    }

    #[test]
    fn test_uniform_version_enforced_by_default() {
        for kind in TargetKind::ALL {
            let target = TargetConfiguration::empty(kind);
            assert_eq!(target.kind(), kind);
            assert!(target.base().enforces_uniform_dependency_version());
        }
    }
}
