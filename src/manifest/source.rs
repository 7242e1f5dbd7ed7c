use toml::{Table, Value};

use super::ManifestError;

/// One value contributed by a source, placed at `path` in the merged table.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub path: Vec<String>,
    pub value: Value,
}

impl ManifestEntry {
    pub fn root(table: Table) -> Self {
        Self {
            path: Vec::new(),
            value: Value::Table(table),
        }
    }

    pub fn at_path(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }
}

/// A layer in the manifest loading pipeline.
pub trait ManifestSource: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<ManifestEntry>, ManifestError>;
}

/// Merges `value` into `table` at `path`, creating intermediate tables.
///
/// A table already at the path is deep-merged; anything else is replaced.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    if rest.is_empty() {
        match (table.get_mut(first), value) {
            (Some(Value::Table(base)), Value::Table(overlay)) => deep_merge(base, overlay),
            (_, value) => {
                table.insert(first.clone(), value);
            }
        }
        return;
    }

    if !matches!(table.get(first), Some(Value::Table(_))) {
        table.insert(first.clone(), Value::Table(Table::new()));
    }

    if let Some(Value::Table(nested)) = table.get_mut(first) {
        merge_at_path(nested, rest, value);
    }
}

/// Recursively merges tables; arrays and scalars in `overlay` replace.
pub fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
