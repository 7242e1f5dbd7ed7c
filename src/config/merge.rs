//! Combinators folding two partial configurations into one.
//!
//! Every function here is pure: inputs are borrowed and never modified.
//! Field rules are the same at every level:
//! - "disable"/"no" switches: OR
//! - "enforce"/"enabled" switches: AND
//! - identifier sets: union
//! - ordered lists: concatenation, base first
//! - optional scalars: the override's value if set, else the base's
//!
//! All of these are associative, so folding declarations in order gives the
//! same result however the fold is grouped.
//!
//! Target slots are the exception. A slot only the base declares is kept
//! only when the merge adds targets automatically. The gated form drops
//! base-only slots and is not associative, so it stays crate-private and is
//! applied exactly once: library defaults under a module declaration.
//! [`compose_module`] is the public, associative fold.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::{
    CommonTarget, ConfigError, DarwinTarget, Dependencies, JsTarget, JvmTarget, Language,
    ModuleConfiguration, TargetBase, TargetConfiguration, TargetKind, Targets,
};

fn concat<T: Clone>(base: &[T], other: &[T]) -> Vec<T> {
    base.iter().chain(other).cloned().collect()
}

fn union<T: Ord + Clone>(base: &BTreeSet<T>, other: &BTreeSet<T>) -> BTreeSet<T> {
    base.union(other).cloned().collect()
}

pub fn merge_dependencies(base: &Dependencies, other: &Dependencies) -> Dependencies {
    Dependencies {
        regular: concat(&base.regular, &other.regular),
        special: concat(&base.special, &other.special),
    }
}

pub fn merge_language(base: &Language, other: &Language) -> Language {
    Language {
        experimental_apis: union(&base.experimental_apis, &other.experimental_apis),
        language_features: union(&base.language_features, &other.language_features),
        no_explicit_api: base.no_explicit_api || other.no_explicit_api,
        version_override: other
            .version_override
            .clone()
            .or_else(|| base.version_override.clone()),
        custom_hooks: concat(&base.custom_hooks, &other.custom_hooks),
    }
}

fn merge_base(base: &TargetBase, other: &TargetBase) -> TargetBase {
    TargetBase {
        dependencies: merge_dependencies(&base.dependencies, &other.dependencies),
        test_dependencies: merge_dependencies(&base.test_dependencies, &other.test_dependencies),
        custom_hooks: concat(&base.custom_hooks, &other.custom_hooks),
        enforces_uniform_dependency_version: base.enforces_uniform_dependency_version
            && other.enforces_uniform_dependency_version,
    }
}

pub(crate) fn merge_common(a: &CommonTarget, b: &CommonTarget) -> CommonTarget {
    CommonTarget {
        base: merge_base(&a.base, &b.base),
    }
}

pub(crate) fn merge_jvm(a: &JvmTarget, b: &JvmTarget) -> JvmTarget {
    JvmTarget {
        base: merge_base(&a.base, &b.base),
        includes_host_language_sources: a.includes_host_language_sources
            || b.includes_host_language_sources,
        disable_new_compiler_backend: a.disable_new_compiler_backend
            || b.disable_new_compiler_backend,
    }
}

pub(crate) fn merge_js(a: &JsTarget, b: &JsTarget) -> JsTarget {
    JsTarget {
        base: merge_base(&a.base, &b.base),
        compiler: b.compiler.or(a.compiler),
        disable_browser_output: a.disable_browser_output || b.disable_browser_output,
        disable_host_runtime_output: a.disable_host_runtime_output
            || b.disable_host_runtime_output,
    }
}

pub(crate) fn merge_darwin(a: &DarwinTarget, b: &DarwinTarget) -> DarwinTarget {
    DarwinTarget {
        base: merge_base(&a.base, &b.base),
        disabled_architectures: union(&a.disabled_architectures, &b.disabled_architectures),
    }
}

/// Merges two targets of the same kind.
///
/// Fails with [`ConfigError::KindMismatch`] if the kinds differ.
pub fn merge_target(
    base: &TargetConfiguration,
    other: &TargetConfiguration,
) -> Result<TargetConfiguration, ConfigError> {
    use TargetConfiguration as T;

    match (base, other) {
        (T::Common(a), T::Common(b)) => Ok(T::Common(merge_common(a, b))),
        (T::Jvm(a), T::Jvm(b)) => Ok(T::Jvm(merge_jvm(a, b))),
        (T::Js(a), T::Js(b)) => Ok(T::Js(merge_js(a, b))),
        (T::Darwin(a), T::Darwin(b)) => Ok(T::Darwin(merge_darwin(a, b))),
        _ => Err(ConfigError::KindMismatch {
            base: base.kind(),
            other: other.kind(),
        }),
    }
}

/// Merges two target maps slot by slot.
///
/// A kind present on both sides is merged. A kind only `other` declares is
/// kept: the declaration opted in to it. A kind only `base` declares is kept
/// when `add_automatically` is true and dropped otherwise.
pub(crate) fn merge_targets(
    base: &Targets,
    other: &Targets,
    add_automatically: bool,
) -> Result<Targets, ConfigError> {
    let mut merged = Targets::new();

    for kind in TargetKind::ALL {
        match (base.get(kind), other.get(kind)) {
            (Some(a), Some(b)) => {
                trace!(%kind, "merging target slot");
                merged.insert(merge_target(a, b)?);
            }
            (None, Some(b)) => {
                merged.insert(b.clone());
            }
            (Some(a), None) if add_automatically => {
                merged.insert(a.clone());
            }
            (Some(_), None) => {
                debug!(%kind, "target not declared by override, not inherited");
            }
            (None, None) => {}
        }
    }

    Ok(merged)
}

/// Merges a module declaration (`other`) on top of `base`.
pub(crate) fn merge_module(
    base: &ModuleConfiguration,
    other: &ModuleConfiguration,
    add_automatically: bool,
) -> Result<ModuleConfiguration, ConfigError> {
    Ok(ModuleConfiguration {
        description: other
            .description
            .clone()
            .or_else(|| base.description.clone()),
        publishing_enabled: base.publishing_enabled && other.publishing_enabled,
        publish_single_target_as_module: base.publish_single_target_as_module
            || other.publish_single_target_as_module,
        language: merge_language(&base.language, &other.language),
        targets: merge_targets(&base.targets, &other.targets, add_automatically)?,
        custom_hooks: concat(&base.custom_hooks, &other.custom_hooks),
    })
}

/// Folds `other` onto `base`, keeping every target either side declares.
///
/// This is how repeated declarations of the same module compose.
pub fn compose_module(
    base: &ModuleConfiguration,
    other: &ModuleConfiguration,
) -> Result<ModuleConfiguration, ConfigError> {
    merge_module(base, other, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DarwinArch, DependencyOp, DependencyScope, JsCompiler};

    fn dep(coordinate: &str) -> DependencyOp {
        DependencyOp::Add {
            scope: DependencyScope::Implementation,
            notation: coordinate.into(),
        }
    }

    fn jvm_with(deps: &[&str]) -> TargetConfiguration {
        TargetConfiguration::Jvm(JvmTarget {
            base: TargetBase {
                dependencies: Dependencies {
                    regular: deps.iter().map(|d| dep(d)).collect(),
                    special: Vec::new(),
                },
                ..TargetBase::default()
            },
            ..JvmTarget::default()
        })
    }

    #[test]
    fn test_dependency_order_base_first() {
        let merged = merge_target(&jvm_with(&["a"]), &jvm_with(&["b", "c"])).unwrap();
        assert_eq!(
            merged.base().dependencies().regular(),
            &[dep("a"), dep("b"), dep("c")]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let target = jvm_with(&["a"]);
        let merged = merge_target(&target, &target).unwrap();
        assert_eq!(merged.base().dependencies().regular(), &[dep("a"), dep("a")]);
    }

    #[test]
    fn test_kind_mismatch_fails() {
        let result = merge_target(
            &TargetConfiguration::empty(TargetKind::Jvm),
            &TargetConfiguration::empty(TargetKind::Js),
        );
        assert_eq!(
            result,
            Err(ConfigError::KindMismatch {
                base: TargetKind::Jvm,
                other: TargetKind::Js,
            })
        );
    }

    #[test]
    fn test_enforce_is_and() {
        let strict = TargetConfiguration::empty(TargetKind::Common);
        let relaxed = TargetConfiguration::Common(CommonTarget {
            base: TargetBase {
                enforces_uniform_dependency_version: false,
                ..TargetBase::default()
            },
        });

        let merged = merge_target(&strict, &relaxed).unwrap();
        assert!(!merged.base().enforces_uniform_dependency_version());
        let merged = merge_target(&relaxed, &strict).unwrap();
        assert!(!merged.base().enforces_uniform_dependency_version());
        let merged = merge_target(&strict, &strict).unwrap();
        assert!(merged.base().enforces_uniform_dependency_version());
    }

    #[test]
    fn test_js_compiler_last_non_null_wins() {
        let with = |compiler| {
            TargetConfiguration::Js(JsTarget {
                compiler,
                ..JsTarget::default()
            })
        };

        let merged = merge_target(&with(Some(JsCompiler::Legacy)), &with(None)).unwrap();
        assert!(matches!(merged, TargetConfiguration::Js(ref js) if js.compiler() == Some(JsCompiler::Legacy)));

        let merged =
            merge_target(&with(Some(JsCompiler::Legacy)), &with(Some(JsCompiler::Ir))).unwrap();
        assert!(matches!(merged, TargetConfiguration::Js(ref js) if js.compiler() == Some(JsCompiler::Ir)));
    }

    #[test]
    fn test_darwin_disable_flags_union() {
        let disable = |arch| {
            TargetConfiguration::Darwin(DarwinTarget {
                disabled_architectures: [arch].into(),
                ..DarwinTarget::default()
            })
        };

        let merged =
            merge_target(&disable(DarwinArch::IosX64), &disable(DarwinArch::MacosX64)).unwrap();
        let TargetConfiguration::Darwin(darwin) = merged else {
            panic!("expected darwin target");
        };
        assert!(darwin.is_disabled(DarwinArch::IosX64));
        assert!(darwin.is_disabled(DarwinArch::MacosX64));
        assert!(!darwin.is_disabled(DarwinArch::IosArm64));
    }

    #[test]
    fn test_language_rules() {
        let base = Language {
            experimental_apis: ["a".to_string()].into(),
            version_override: Some("1.8".into()),
            ..Language::default()
        };
        let other = Language {
            experimental_apis: ["b".to_string()].into(),
            no_explicit_api: true,
            ..Language::default()
        };

        let merged = merge_language(&base, &other);
        assert_eq!(merged.experimental_apis().len(), 2);
        assert!(merged.no_explicit_api());
        assert_eq!(merged.version_override(), Some("1.8"));
    }

    #[test]
    fn test_one_sided_slots() {
        let base: Targets = [TargetConfiguration::empty(TargetKind::Jvm)]
            .into_iter()
            .collect();
        let other: Targets = [TargetConfiguration::empty(TargetKind::Js)]
            .into_iter()
            .collect();

        let inherited = merge_targets(&base, &other, false).unwrap();
        assert_eq!(inherited.kinds().collect::<Vec<_>>(), vec![TargetKind::Js]);

        let combined = merge_targets(&base, &other, true).unwrap();
        assert_eq!(
            combined.kinds().collect::<Vec<_>>(),
            vec![TargetKind::Jvm, TargetKind::Js]
        );
    }

    #[test]
    fn test_module_scalars() {
        let base = ModuleConfiguration {
            description: Some("base".into()),
            ..ModuleConfiguration::default()
        };
        let other = ModuleConfiguration {
            publishing_enabled: false,
            publish_single_target_as_module: true,
            ..ModuleConfiguration::default()
        };

        let merged = merge_module(&base, &other, false).unwrap();
        assert_eq!(merged.description(), Some("base"));
        assert!(!merged.publishing_enabled());
        assert!(merged.publish_single_target_as_module());
        assert!(merged.targets().common().is_some());
    }

    fn module_with(targets: Vec<TargetConfiguration>) -> ModuleConfiguration {
        ModuleConfiguration {
            targets: targets.into_iter().collect(),
            ..ModuleConfiguration::default()
        }
    }

    fn jvm_deps(module: &ModuleConfiguration) -> Vec<DependencyOp> {
        module
            .targets()
            .jvm()
            .map(|jvm| jvm.base().dependencies().regular().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_gated_merge_depends_on_grouping() {
        let a = module_with(vec![jvm_with(&["a"])]);
        let b = module_with(Vec::new());
        let c = module_with(vec![jvm_with(&["c"])]);

        let left = merge_module(&merge_module(&a, &b, false).unwrap(), &c, false).unwrap();
        let right = merge_module(&a, &merge_module(&b, &c, false).unwrap(), false).unwrap();
        assert_eq!(jvm_deps(&left), vec![dep("c")]);
        assert_eq!(jvm_deps(&right), vec![dep("a"), dep("c")]);

        let left = compose_module(&compose_module(&a, &b).unwrap(), &c).unwrap();
        let right = compose_module(&a, &compose_module(&b, &c).unwrap()).unwrap();
        assert_eq!(jvm_deps(&left), vec![dep("a"), dep("c")]);
        assert_eq!(left.targets(), right.targets());
    }
}
