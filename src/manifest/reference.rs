//! `${section.field}` references between manifest values.
//!
//! A reference is replaced by the scalar it points at, which may itself
//! contain references. `$$` produces a literal `$`, so `$${x}` survives as
//! the text `${x}` and is never expanded.

use toml::{Table, Value};

use super::ManifestError;

/// Resolves every reference in `table`, in place.
pub fn resolve_references(table: &mut Table) -> Result<(), ManifestError> {
    let root = table.clone();
    let mut resolver = Resolver {
        root: &root,
        in_progress: Vec::new(),
    };

    for (_, value) in table.iter_mut() {
        resolver.resolve_value(value)?;
    }
    Ok(())
}

struct Resolver<'a> {
    root: &'a Table,
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn resolve_value(&mut self, value: &mut Value) -> Result<(), ManifestError> {
        match value {
            Value::String(s) => {
                *s = self.expand(s)?;
            }
            Value::Table(t) => {
                for (_, nested) in t.iter_mut() {
                    self.resolve_value(nested)?;
                }
            }
            Value::Array(arr) => {
                for item in arr.iter_mut() {
                    self.resolve_value(item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn expand(&mut self, s: &str) -> Result<String, ManifestError> {
        let mut result = String::with_capacity(s.len());
        let mut chars = s.chars();

        while let Some(ch) = chars.next() {
            if ch != '$' {
                result.push(ch);
                continue;
            }

            match chars.clone().next() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let path = consume_until(&mut chars, '}').ok_or(ManifestError::UnclosedReference)?;
                    result.push_str(&self.lookup(&path)?);
                }
                _ => result.push('$'),
            }
        }

        Ok(result)
    }

    fn lookup(&mut self, path: &str) -> Result<String, ManifestError> {
        let parts: Vec<&str> = path.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ManifestError::InvalidReferencePath(path.to_string()));
        }
        if self.in_progress.iter().any(|p| p == path) {
            return Err(ManifestError::CircularReference(path.to_string()));
        }

        let not_found = || ManifestError::ReferenceNotFound(path.to_string());
        let root: &'a Table = self.root;
        let mut current = root.get(parts[0]).ok_or_else(not_found)?;
        for part in &parts[1..] {
            current = current
                .as_table()
                .and_then(|t| t.get(*part))
                .ok_or_else(not_found)?;
        }

        match current {
            Value::String(s) => {
                self.in_progress.push(path.to_string());
                let expanded = self.expand(s);
                self.in_progress.pop();
                expanded
            }
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Datetime(dt) => Ok(dt.to_string()),
            Value::Array(_) | Value::Table(_) => {
                Err(ManifestError::NonScalarReference(path.to_string()))
            }
        }
    }
}

fn consume_until(chars: &mut std::str::Chars<'_>, delim: char) -> Option<String> {
    let mut result = String::new();
    for ch in chars.by_ref() {
        if ch == delim {
            return Some(result);
        }
        result.push(ch);
    }
    None
}
