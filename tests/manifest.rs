use std::fs;

use module_compose::config::{ConfigError, DependencyOp, JsCompiler};
use module_compose::manifest::{ManifestError, ManifestLoader};
use module_compose::{ConfigurationPass, TargetKind, TargetSettings};
use tempfile::TempDir;

const LIBRARY: &str = r#"
[library]
name = "fluid-json"
version = "1.4.0"
include_unstable_dependency_updates = true

[all_modules.language]
experimental_apis = ["kotlin.RequiresOptIn"]

[all_modules.targets.jvm]
with_java = true
dependencies = [{ api = "org.example:fluid-core:${library.version}" }]

[all_modules.targets.js]
compiler = "legacy"
"#;

const MODULE: &str = r#"
description = "JSON coroutines"

[language]
experimental_apis = ["kotlinx.coroutines.ExperimentalCoroutinesApi"]

[targets.jvm]
dependencies = [
    { implementation = "org.example:coroutines:1.7" },
    { kapt = "org.example:codegen:1.0" },
]

[targets.js]
browser = false
"#;

#[test]
fn library_and_module_files_resolve_together() {
    let dir = TempDir::new().unwrap();
    let library_path = dir.path().join("library.toml");
    let module_path = dir.path().join("module.toml");
    fs::write(&library_path, LIBRARY).unwrap();
    fs::write(&module_path, MODULE).unwrap();

    let library = ManifestLoader::builder()
        .with_file(&library_path, true)
        .with_file(dir.path().join("library.local.toml"), false)
        .load_library()
        .unwrap();
    assert!(library.info().include_unstable_dependency_updates);

    let declaration = ManifestLoader::builder()
        .with_file(&module_path, true)
        .load_module()
        .unwrap();
    let module = library.resolve(&declaration).unwrap();

    assert_eq!(module.description(), Some("JSON coroutines"));
    assert_eq!(
        module.configuration().language().experimental_apis().len(),
        2
    );

    let jvm = module.configuration().targets().jvm().unwrap();
    let notations: Vec<String> = jvm
        .base()
        .dependencies()
        .regular()
        .iter()
        .filter_map(|op| match op {
            DependencyOp::Add { notation, .. } => Some(notation.to_string()),
            DependencyOp::Custom(_) => None,
        })
        .collect();
    assert_eq!(
        notations,
        vec!["org.example:fluid-core:1.4.0", "org.example:coroutines:1.7"]
    );
    assert_eq!(jvm.base().dependencies().special().len(), 1);

    assert_eq!(
        module.target(TargetKind::Js).unwrap().settings(),
        &TargetSettings::Js {
            compiler: JsCompiler::Legacy,
            browser: false,
            node_js: true,
        }
    );
}

#[test]
fn local_file_overrides_shared_file() {
    let dir = TempDir::new().unwrap();
    let shared = dir.path().join("library.toml");
    let local = dir.path().join("library.local.toml");
    fs::write(&shared, LIBRARY).unwrap();
    fs::write(&local, "[all_modules.targets.js]\ncompiler = \"both\"\n").unwrap();

    let library = ManifestLoader::builder()
        .with_file(&shared, true)
        .with_file(&local, false)
        .load_library()
        .unwrap();

    let js = library.defaults().targets().js().unwrap();
    assert_eq!(js.compiler(), Some(JsCompiler::Both));
    assert!(library.defaults().targets().jvm().is_some());
}

#[test]
fn kapt_without_java_surfaces_at_resolution() {
    let mut pass = ConfigurationPass::new();
    pass.register(
        ManifestLoader::builder()
            .with_str("library", "[library]\nname = \"lib\"\nversion = \"1.0\"")
            .load_library()
            .unwrap(),
    )
    .unwrap();

    let declaration = ManifestLoader::builder()
        .with_str(
            "module",
            "[targets.jvm]\ndependencies = [{ kapt = \"org.example:codegen:1.0\" }]",
        )
        .load_module()
        .unwrap();

    let result = pass.library().unwrap().resolve(&declaration);
    assert!(matches!(
        result,
        Err(ConfigError::MissingPrerequisite {
            target: TargetKind::Jvm,
            ..
        })
    ));
}

#[test]
fn escaped_references_stay_literal() {
    let library = ManifestLoader::builder()
        .with_str(
            "library",
            r#"
            [library]
            name = "lib"
            version = "1.0"

            [all_modules.targets.common]
            dependencies = [{ api = "org.example:templated:$${version}" }]
            "#,
        )
        .load_library()
        .unwrap();

    let common = library.defaults().targets().common().unwrap();
    match &common.base().dependencies().regular()[0] {
        DependencyOp::Add { notation, .. } => {
            assert_eq!(notation.to_string(), "org.example:templated:${version}")
        }
        other => panic!("unexpected op: {other:?}"),
    }
}

#[test]
fn circular_reference_is_reported() {
    let result = ManifestLoader::builder()
        .with_str(
            "library",
            "[library]\nname = \"${library.version}\"\nversion = \"${library.name}\"",
        )
        .load_library();
    assert!(matches!(result, Err(ManifestError::CircularReference(_))));
}
