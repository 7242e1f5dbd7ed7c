/// Directory layout of one source root.
///
/// Every root owns four directories named after its suffix:
/// `sources<suffix>`, `tests<suffix>`, `resources<suffix>` and
/// `test-resources<suffix>`. The common root has an empty suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetLayout {
    name: String,
    suffix: String,
    depends_on: Option<String>,
}

impl SourceSetLayout {
    pub(crate) fn new(name: &str, path: Option<&str>, depends_on: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            suffix: path.map(|p| format!("-{p}")).unwrap_or_default(),
            depends_on: depends_on.map(str::to_string),
        }
    }

    /// Host-side name of the root, e.g. `common`, `jvm` or `iosArm64`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The root this one builds on, if any.
    pub fn depends_on(&self) -> Option<&str> {
        self.depends_on.as_deref()
    }

    pub fn sources(&self) -> String {
        format!("sources{}", self.suffix)
    }

    pub fn tests(&self) -> String {
        format!("tests{}", self.suffix)
    }

    pub fn resources(&self) -> String {
        format!("resources{}", self.suffix)
    }

    pub fn test_resources(&self) -> String {
        format!("test-resources{}", self.suffix)
    }

    /// All four directories, main before test.
    pub fn directories(&self) -> [String; 4] {
        [
            self.sources(),
            self.tests(),
            self.resources(),
            self.test_resources(),
        ]
    }
}
