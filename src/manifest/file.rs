//! File and inline manifest sources.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use toml::Table;
use tracing::{debug, info};

use super::source::{ManifestEntry, ManifestSource};
use super::ManifestError;

/// A manifest loaded from a TOML file.
///
/// Required files that don't exist cause an error; optional ones are skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ManifestSource for FileSource {
    fn entries(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        let path = self.path.as_path();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() != ErrorKind::NotFound => {
                return Err(ManifestError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
            Err(_) if self.required => return Err(ManifestError::FileNotFound(path.to_path_buf())),
            Err(_) => {
                debug!(path = %path.display(), "optional manifest absent");
                return Ok(Vec::new());
            }
        };

        let table = parse_table(&contents).map_err(|source| ManifestError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), keys = table.len(), "loaded manifest");
        Ok(vec![ManifestEntry::root(table)])
    }
}

fn parse_table(contents: &str) -> Result<Table, toml::de::Error> {
    contents.parse::<Table>()
}

/// A manifest given as a string, e.g. embedded in a build script.
#[derive(Debug, Clone)]
pub struct InlineSource {
    name: String,
    contents: String,
}

impl InlineSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

impl ManifestSource for InlineSource {
    fn entries(&self) -> Result<Vec<ManifestEntry>, ManifestError> {
        let table = parse_table(&self.contents).map_err(|source| ManifestError::InlineParseError {
            name: self.name.clone(),
            source,
        })?;
        Ok(vec![ManifestEntry::root(table)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_loads_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[library]\nname = \"lib\"").unwrap();

        let entries = FileSource::new(file.path(), true).entries().unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.is_empty());
        assert_eq!(entries[0].value["library"]["name"].as_str(), Some("lib"));
    }

    #[test]
    fn test_file_source_required_missing() {
        let result = FileSource::new("/nonexistent/path/library.toml", true).entries();
        assert!(matches!(result, Err(ManifestError::FileNotFound(_))));
    }

    #[test]
    fn test_file_source_optional_missing() {
        let entries = FileSource::new("/nonexistent/path/library.toml", false)
            .entries()
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_file_source_reports_parse_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[library").unwrap();

        let result = FileSource::new(file.path(), true).entries();
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn test_inline_source_names_itself_in_errors() {
        let result = InlineSource::new("defaults", "not toml =").entries();
        match result {
            Err(ManifestError::InlineParseError { name, .. }) => assert_eq!(name, "defaults"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
