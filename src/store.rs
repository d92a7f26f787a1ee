// src/store.rs
use std::path::{Path, PathBuf};

use crate::csv;
use crate::error::{Error, Result};
use crate::file::ensure_parent;

/// Headers + rows of plain strings. The shape every table takes on its way to disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h == name)
    }

    /// Column index or an input error naming the missing column.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::Input(format!("missing required column '{name}'")))
    }

    /// Append a column; rows shorter than the header are padded first.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        let width = self.headers.as_ref().map(Vec::len).unwrap_or(0);
        if let Some(h) = self.headers.as_mut() {
            h.push(s!(name));
        }
        for (row, v) in self.rows.iter_mut().zip(values) {
            if row.len() < width {
                row.resize(width, s!());
            }
            row.push(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a CSV with a header row.
pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Input(format!("{}: {e}", path.display())))?;
    csv::read_table(file)
}

/// Write a dataset as CSV (header row first when present). Returns the path written.
pub fn save_dataset(path: &Path, ds: &DataSet) -> Result<PathBuf> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path)?;
    csv::write_table(file, ds)?;
    Ok(path.to_path_buf())
}
