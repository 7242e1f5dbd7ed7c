use std::any::Any;

use module_compose::config::Notation;
use module_compose::dsl::prelude::*;
use module_compose::host::{DependencyHandler, TargetHost};
use module_compose::{ConfigurationPass, ManifestLoader, TargetKind};

const LIBRARY: &str = r#"
[library]
name = "fluid-json"
version = "1.4.0"

[all_modules.language]
experimental_apis = ["kotlin.RequiresOptIn"]

[all_modules.targets.jvm]
dependencies = [{ implementation = "org.example:fluid-core:${library.version}" }]

[all_modules.targets.js]
dependencies = [{ npm = { name = "left-pad", version = "1.3.0" } }]
"#;

struct PrintingHandler;

impl DependencyHandler for PrintingHandler {
    fn add(&mut self, configuration: &str, notation: &Notation) {
        println!("    {configuration}({notation})");
    }
}

struct PrintingTarget(String);

impl TargetHost for PrintingTarget {
    fn name(&self) -> &str {
        &self.0
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn main() -> Result<(), module_compose::Error> {
    let mut pass = ConfigurationPass::new();
    pass.register(ManifestLoader::builder().with_str("library", LIBRARY).load_library()?)?;

    let module = pass.declare_module("JSON core", |m| {
        m.targets(|t| {
            t.jvm(|jvm| {
                jvm.with_java()
                    .dependencies(|d| {
                        d.api("org.example:parser:2.0")
                            .kapt("org.example:codegen:2.0");
                    })
                    .custom(|target| println!("  customizing {}", target.name()));
            });
            t.darwin(|darwin| {
                darwin.without_tvos().without_watchos();
            });
        });
    })?;

    println!(
        "{} {}: {}",
        module.library().name,
        module.library().version,
        module.description().unwrap_or("<no description>")
    );

    for target in module.targets() {
        println!("{} -> {:?}", target.kind(), target.host_targets());
        for source_set in target.source_sets() {
            println!(
                "  {} [{}] depends on {:?}",
                source_set.name(),
                source_set.directories().join(", "),
                source_set.depends_on()
            );
        }

        let base = target.configuration().base();
        base.dependencies().apply_regular(&mut PrintingHandler);
        base.dependencies().apply_special(&mut PrintingHandler);
        if target.kind() == TargetKind::Jvm {
            target.run_hooks(&mut PrintingTarget("jvm".into()));
        }
    }

    Ok(())
}
