use toml::Value;

use super::source::{ManifestEntry, ManifestSource};
use super::ManifestError;

/// Manifest values taken from environment variables.
///
/// `PREFIX<sep>LIBRARY<sep>VERSION=1.4.0` lands at `library.version`.
/// Path segments are lowercased. `true` and `false` (any case) become
/// booleans so switches can be flipped; every other value stays a string,
/// since the manifest has no numeric fields and `VERSION=2.0` must read
/// back as `"2.0"`.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    fn entries_from(
        &self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Vec<ManifestEntry>, ManifestError> {
        if self.separator.is_empty() {
            return Err(ManifestError::EmptyEnvSeparator);
        }

        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut entries = Vec::new();

        for (key, value) in vars {
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            if path_str.is_empty() {
                continue;
            }

            let path = path_str
                .split(self.separator.as_str())
                .map(str::to_lowercase)
                .collect();
            entries.push(ManifestEntry::at_path(path, coerce_value(&value)));
        }

        Ok(entries)
    }
}

impl ManifestSource for EnvSource {
    fn entries(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        self.entries_from(std::env::vars())
    }
}

fn coerce_value(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => Value::String(raw.to_string()),
    }
}
