use tracing::trace;

use super::dependencies::{DependenciesBuilder, ManagedRuntime, Plain, Web};
use crate::config::merge::{
    merge_common, merge_darwin, merge_dependencies, merge_js, merge_jvm,
};
use crate::config::{
    CommonTarget, DarwinArch, DarwinTarget, Dependencies, Hook, JsCompiler, JsTarget, JvmTarget,
    TargetBase, TargetConfiguration, TargetHook, Targets,
};
use crate::host::TargetHost;

/// Shared part of every target block.
#[derive(Debug)]
pub struct TargetBaseBuilder {
    dependencies: Dependencies,
    test_dependencies: Dependencies,
    custom_hooks: Vec<TargetHook>,
    enforces_uniform_dependency_version: bool,
}

impl Default for TargetBaseBuilder {
    fn default() -> Self {
        Self {
            dependencies: Dependencies::default(),
            test_dependencies: Dependencies::default(),
            custom_hooks: Vec::new(),
            enforces_uniform_dependency_version: true,
        }
    }
}

impl TargetBaseBuilder {
    fn build(self) -> TargetBase {
        TargetBase {
            dependencies: self.dependencies,
            test_dependencies: self.test_dependencies,
            custom_hooks: self.custom_hooks,
            enforces_uniform_dependency_version: self.enforces_uniform_dependency_version,
        }
    }
}

/// Operations available in every target block.
pub trait TargetDsl {
    /// Capability flavour of this target's dependency blocks.
    type Capabilities;

    #[doc(hidden)]
    fn base_builder(&mut self) -> &mut TargetBaseBuilder;

    /// Adds a dependency block. Repeated blocks append in order.
    fn dependencies(
        &mut self,
        configure: impl FnOnce(&mut DependenciesBuilder<Self::Capabilities>),
    ) -> &mut Self
    where
        Self: Sized,
    {
        let mut builder = DependenciesBuilder::default();
        configure(&mut builder);
        let base = self.base_builder();
        base.dependencies = merge_dependencies(&base.dependencies, &builder.build());
        self
    }

    fn test_dependencies(
        &mut self,
        configure: impl FnOnce(&mut DependenciesBuilder<Self::Capabilities>),
    ) -> &mut Self
    where
        Self: Sized,
    {
        let mut builder = DependenciesBuilder::default();
        configure(&mut builder);
        let base = self.base_builder();
        base.test_dependencies = merge_dependencies(&base.test_dependencies, &builder.build());
        self
    }

    fn custom(
        &mut self,
        configure: impl Fn(&mut (dyn TargetHost + 'static)) + Send + Sync + 'static,
    ) -> &mut Self
    where
        Self: Sized,
    {
        self.base_builder().custom_hooks.push(Hook::new(configure));
        self
    }

    /// Stops pinning language-distribution dependencies to the compiler version.
    fn without_enforcing_uniform_dependency_version(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.base_builder().enforces_uniform_dependency_version = false;
        self
    }
}

#[derive(Debug, Default)]
pub struct CommonTargetBuilder {
    base: TargetBaseBuilder,
}

impl CommonTargetBuilder {
    pub(crate) fn build(self) -> CommonTarget {
        CommonTarget {
            base: self.base.build(),
        }
    }
}

impl TargetDsl for CommonTargetBuilder {
    type Capabilities = Plain;

    fn base_builder(&mut self) -> &mut TargetBaseBuilder {
        &mut self.base
    }
}

#[derive(Debug, Default)]
pub struct JvmTargetBuilder {
    base: TargetBaseBuilder,
    includes_host_language_sources: bool,
    disable_new_compiler_backend: bool,
}

impl JvmTargetBuilder {
    pub(crate) fn build(self) -> JvmTarget {
        JvmTarget {
            base: self.base.build(),
            includes_host_language_sources: self.includes_host_language_sources,
            disable_new_compiler_backend: self.disable_new_compiler_backend,
        }
    }

    /// Compiles host-language sources next to the module's own.
    pub fn with_java(&mut self) -> &mut Self {
        self.includes_host_language_sources = true;
        self
    }

    pub fn without_new_compiler_backend(&mut self) -> &mut Self {
        self.disable_new_compiler_backend = true;
        self
    }
}

impl TargetDsl for JvmTargetBuilder {
    type Capabilities = ManagedRuntime;

    fn base_builder(&mut self) -> &mut TargetBaseBuilder {
        &mut self.base
    }
}

#[derive(Debug, Default)]
pub struct JsTargetBuilder {
    base: TargetBaseBuilder,
    compiler: Option<JsCompiler>,
    disable_browser_output: bool,
    disable_host_runtime_output: bool,
}

impl JsTargetBuilder {
    pub(crate) fn build(self) -> JsTarget {
        JsTarget {
            base: self.base.build(),
            compiler: self.compiler,
            disable_browser_output: self.disable_browser_output,
            disable_host_runtime_output: self.disable_host_runtime_output,
        }
    }

    /// Selects the compiler backend. The last call wins.
    pub fn compiler(&mut self, compiler: JsCompiler) -> &mut Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn without_browser(&mut self) -> &mut Self {
        self.disable_browser_output = true;
        self
    }

    pub fn without_node_js(&mut self) -> &mut Self {
        self.disable_host_runtime_output = true;
        self
    }
}

impl TargetDsl for JsTargetBuilder {
    type Capabilities = Web;

    fn base_builder(&mut self) -> &mut TargetBaseBuilder {
        &mut self.base
    }
}

#[derive(Debug, Default)]
pub struct DarwinTargetBuilder {
    base: TargetBaseBuilder,
    disabled_architectures: std::collections::BTreeSet<DarwinArch>,
}

impl DarwinTargetBuilder {
    pub(crate) fn build(self) -> DarwinTarget {
        DarwinTarget {
            base: self.base.build(),
            disabled_architectures: self.disabled_architectures,
        }
    }

    /// Skips one architecture.
    pub fn without(&mut self, arch: DarwinArch) -> &mut Self {
        self.disabled_architectures.insert(arch);
        self
    }

    /// Keeps only `archs`, switching every other architecture off.
    pub fn only(&mut self, archs: &[DarwinArch]) -> &mut Self {
        for arch in DarwinArch::ALL {
            if !archs.contains(&arch) {
                self.disabled_architectures.insert(arch);
            }
        }
        self
    }

    pub fn without_ios(&mut self) -> &mut Self {
        self.without(DarwinArch::IosArm64)
            .without(DarwinArch::IosSimulatorArm64)
            .without(DarwinArch::IosX64)
    }

    pub fn without_macos(&mut self) -> &mut Self {
        self.without(DarwinArch::MacosArm64)
            .without(DarwinArch::MacosX64)
    }

    pub fn without_tvos(&mut self) -> &mut Self {
        self.without(DarwinArch::TvosArm64)
            .without(DarwinArch::TvosSimulatorArm64)
            .without(DarwinArch::TvosX64)
    }

    pub fn without_watchos(&mut self) -> &mut Self {
        self.without(DarwinArch::WatchosArm32)
            .without(DarwinArch::WatchosArm64)
            .without(DarwinArch::WatchosDeviceArm64)
            .without(DarwinArch::WatchosSimulatorArm64)
            .without(DarwinArch::WatchosX64)
    }
}

impl TargetDsl for DarwinTargetBuilder {
    type Capabilities = Plain;

    fn base_builder(&mut self) -> &mut TargetBaseBuilder {
        &mut self.base
    }
}

/// Accumulates one `targets { ... }` block.
///
/// Declaring the same kind twice merges the two blocks rather than
/// replacing the first.
#[derive(Debug, Default)]
pub struct TargetsBuilder {
    common: Option<CommonTarget>,
    jvm: Option<JvmTarget>,
    js: Option<JsTarget>,
    darwin: Option<DarwinTarget>,
}

fn fold<T>(slot: &mut Option<T>, next: T, merge: fn(&T, &T) -> T) {
    *slot = Some(match slot.take() {
        Some(previous) => merge(&previous, &next),
        None => next,
    });
}

impl TargetsBuilder {
    pub(crate) fn build(self) -> Targets {
        [
            self.common.map(TargetConfiguration::Common),
            self.jvm.map(TargetConfiguration::Jvm),
            self.js.map(TargetConfiguration::Js),
            self.darwin.map(TargetConfiguration::Darwin),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn common(&mut self, configure: impl FnOnce(&mut CommonTargetBuilder)) -> &mut Self {
        let mut builder = CommonTargetBuilder::default();
        configure(&mut builder);
        trace!(kind = "common", "folding target block");
        fold(&mut self.common, builder.build(), merge_common);
        self
    }

    pub fn jvm(&mut self, configure: impl FnOnce(&mut JvmTargetBuilder)) -> &mut Self {
        let mut builder = JvmTargetBuilder::default();
        configure(&mut builder);
        trace!(kind = "jvm", "folding target block");
        fold(&mut self.jvm, builder.build(), merge_jvm);
        self
    }

    pub fn js(&mut self, configure: impl FnOnce(&mut JsTargetBuilder)) -> &mut Self {
        let mut builder = JsTargetBuilder::default();
        configure(&mut builder);
        trace!(kind = "js", "folding target block");
        fold(&mut self.js, builder.build(), merge_js);
        self
    }

    pub fn darwin(&mut self, configure: impl FnOnce(&mut DarwinTargetBuilder)) -> &mut Self {
        let mut builder = DarwinTargetBuilder::default();
        configure(&mut builder);
        trace!(kind = "darwin", "folding target block");
        fold(&mut self.darwin, builder.build(), merge_darwin);
        self
    }
}
