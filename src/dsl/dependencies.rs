//! Dependency blocks.
//!
//! Every target kind gets a [`DependenciesBuilder`]. The operations all
//! kinds share live on [`DependenciesDsl`]; kind-specific operations are
//! extra capability traits implemented only for the matching builder
//! flavour, so `kapt` is only callable inside a managed-runtime block and
//! `npm` only inside a web block.

use std::marker::PhantomData;

use crate::config::{Dependencies, DependencyOp, DependencyScope, Hook, Notation};
use crate::host::DependencyHandler;

/// Capability marker for blocks with only the shared operations.
#[derive(Debug)]
pub enum Plain {}

/// Capability marker for managed-runtime dependency blocks.
#[derive(Debug)]
pub enum ManagedRuntime {}

/// Capability marker for web/script dependency blocks.
#[derive(Debug)]
pub enum Web {}

/// Accumulates one `dependencies { ... }` block.
#[derive(Debug)]
pub struct DependenciesBuilder<C = Plain> {
    regular: Vec<DependencyOp>,
    special: Vec<DependencyOp>,
    _capabilities: PhantomData<C>,
}

impl<C> Default for DependenciesBuilder<C> {
    fn default() -> Self {
        Self {
            regular: Vec::new(),
            special: Vec::new(),
            _capabilities: PhantomData,
        }
    }
}

impl<C> DependenciesBuilder<C> {
    pub(crate) fn build(self) -> Dependencies {
        Dependencies {
            regular: self.regular,
            special: self.special,
        }
    }

    fn add(&mut self, scope: DependencyScope, notation: Notation) {
        self.regular.push(DependencyOp::Add { scope, notation });
    }
}

/// Operations available in every dependency block.
pub trait DependenciesDsl {
    #[doc(hidden)]
    fn push_regular(&mut self, op: DependencyOp);

    fn api(&mut self, notation: impl Into<Notation>) -> &mut Self
    where
        Self: Sized,
    {
        self.push_regular(DependencyOp::Add {
            scope: DependencyScope::Api,
            notation: notation.into(),
        });
        self
    }

    fn implementation(&mut self, notation: impl Into<Notation>) -> &mut Self
    where
        Self: Sized,
    {
        self.push_regular(DependencyOp::Add {
            scope: DependencyScope::Implementation,
            notation: notation.into(),
        });
        self
    }

    fn compile_only(&mut self, notation: impl Into<Notation>) -> &mut Self
    where
        Self: Sized,
    {
        self.push_regular(DependencyOp::Add {
            scope: DependencyScope::CompileOnly,
            notation: notation.into(),
        });
        self
    }

    fn runtime_only(&mut self, notation: impl Into<Notation>) -> &mut Self
    where
        Self: Sized,
    {
        self.push_regular(DependencyOp::Add {
            scope: DependencyScope::RuntimeOnly,
            notation: notation.into(),
        });
        self
    }

    /// Defers an arbitrary operation on the host dependency handler.
    fn custom(
        &mut self,
        configure: impl Fn(&mut (dyn DependencyHandler + 'static)) + Send + Sync + 'static,
    ) -> &mut Self
    where
        Self: Sized,
    {
        self.push_regular(DependencyOp::Custom(Hook::new(configure)));
        self
    }

    /// A module from the language distribution, optionally version-pinned.
    fn platform(&self, module: &str, version: Option<&str>) -> Notation {
        Notation::Platform {
            module: module.to_string(),
            version: version.map(str::to_string),
        }
    }

    /// Another project of the same build.
    fn project(&self, path: &str, configuration: Option<&str>) -> Notation {
        Notation::Project {
            path: path.to_string(),
            configuration: configuration.map(str::to_string),
        }
    }
}

impl<C> DependenciesDsl for DependenciesBuilder<C> {
    fn push_regular(&mut self, op: DependencyOp) {
        self.regular.push(op);
    }
}

/// Annotation-processor dependencies. Requires the target to compile
/// host-language sources, checked at resolution.
pub trait AnnotationProcessorDsl: DependenciesDsl {
    fn kapt(&mut self, notation: impl Into<Notation>) -> &mut Self
    where
        Self: Sized;
}

impl AnnotationProcessorDsl for DependenciesBuilder<ManagedRuntime> {
    fn kapt(&mut self, notation: impl Into<Notation>) -> &mut Self {
        self.special.push(DependencyOp::Add {
            scope: DependencyScope::AnnotationProcessor,
            notation: notation.into(),
        });
        self
    }
}

/// Packages from the script ecosystem's registry.
pub trait PackageDsl: DependenciesDsl {
    fn npm(&self, name: &str, version: &str) -> Notation {
        Notation::Package {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    /// Shorthand for `implementation(npm(name, version))`.
    fn npm_implementation(&mut self, name: &str, version: &str) -> &mut Self
    where
        Self: Sized;
}

impl PackageDsl for DependenciesBuilder<Web> {
    fn npm_implementation(&mut self, name: &str, version: &str) -> &mut Self {
        let notation = self.npm(name, version);
        self.add(DependencyScope::Implementation, notation);
        self
    }
}
