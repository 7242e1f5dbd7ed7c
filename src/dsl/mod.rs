//! Builders behind the nested declaration interface.
//!
//! Each builder accumulates calls locally and snapshots an immutable
//! [`config`](crate::config) entity when its block ends. Repeated blocks
//! for the same entity are folded with the merge engine, so they compose.

mod dependencies;
mod language;
mod module;
mod target;

pub use dependencies::{
    AnnotationProcessorDsl, DependenciesBuilder, DependenciesDsl, ManagedRuntime, PackageDsl,
    Plain, Web,
};
pub use language::LanguageBuilder;
pub use module::ModuleBuilder;
pub use target::{
    CommonTargetBuilder, DarwinTargetBuilder, JsTargetBuilder, JvmTargetBuilder, TargetBaseBuilder,
    TargetDsl, TargetsBuilder,
};

/// Traits needed to call the shared block operations.
pub mod prelude {
    pub use super::{AnnotationProcessorDsl, DependenciesDsl, PackageDsl, TargetDsl};
}
