use std::fmt;

use super::DependencyHook;
use crate::host::DependencyHandler;

/// What a dependency points at.
///
/// Notations are kept structural; formatting them into host coordinates is
/// the collaborator's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Notation {
    /// A plain `group:artifact:version` coordinate.
    Coordinate(String),
    /// A module shipped with the language distribution itself.
    Platform {
        module: String,
        version: Option<String>,
    },
    /// Another project in the same build.
    Project {
        path: String,
        configuration: Option<String>,
    },
    /// A web package from the script ecosystem's registry.
    Package { name: String, version: String },
}

impl From<&str> for Notation {
    fn from(value: &str) -> Self {
        Notation::Coordinate(value.to_string())
    }
}

impl From<String> for Notation {
    fn from(value: String) -> Self {
        Notation::Coordinate(value)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Coordinate(c) => f.write_str(c),
            Notation::Platform { module, version } => match version {
                Some(v) => write!(f, "platform:{module}:{v}"),
                None => write!(f, "platform:{module}"),
            },
            Notation::Project {
                path,
                configuration,
            } => match configuration {
                Some(c) => write!(f, "project({path}, {c})"),
                None => write!(f, "project({path})"),
            },
            Notation::Package { name, version } => write!(f, "package:{name}@{version}"),
        }
    }
}

/// Host configuration a dependency is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyScope {
    Api,
    Implementation,
    CompileOnly,
    RuntimeOnly,
    /// Annotation processors. Lives in the special bucket.
    AnnotationProcessor,
}

impl DependencyScope {
    pub fn configuration_name(self) -> &'static str {
        match self {
            DependencyScope::Api => "api",
            DependencyScope::Implementation => "implementation",
            DependencyScope::CompileOnly => "compileOnly",
            DependencyScope::RuntimeOnly => "runtimeOnly",
            DependencyScope::AnnotationProcessor => "kapt",
        }
    }
}

/// A deferred "add a dependency" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyOp {
    Add {
        scope: DependencyScope,
        notation: Notation,
    },
    Custom(DependencyHook),
}

impl DependencyOp {
    pub fn apply<H: DependencyHandler + 'static>(&self, handler: &mut H) {
        match self {
            DependencyOp::Add { scope, notation } => {
                handler.add(scope.configuration_name(), notation)
            }
            DependencyOp::Custom(hook) => hook.call(handler),
        }
    }
}

/// Ordered dependency operations, split into a regular and a special bucket.
///
/// Order is significant and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub(crate) regular: Vec<DependencyOp>,
    pub(crate) special: Vec<DependencyOp>,
}

impl Dependencies {
    pub fn regular(&self) -> &[DependencyOp] {
        &self.regular
    }

    pub fn special(&self) -> &[DependencyOp] {
        &self.special
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.special.is_empty()
    }

    /// Replays the regular bucket against `handler`.
    pub fn apply_regular<H: DependencyHandler + 'static>(&self, handler: &mut H) {
        for op in &self.regular {
            op.apply(handler);
        }
    }

    /// Replays the special bucket against `handler`.
    pub fn apply_special<H: DependencyHandler + 'static>(&self, handler: &mut H) {
        for op in &self.special {
            op.apply(handler);
        }
    }
}
