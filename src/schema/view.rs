// src/schema/view.rs
use crate::config::sources::StatTable;
use crate::table::SourceTable;

use super::ColumnMapping;

/// One source seen through the canonical schema. A canonical column this source does
/// not define is simply absent here; filling it is the merge's job.
#[derive(Debug)]
pub struct CanonicalView<'t> {
    table: &'t SourceTable,
    kind: StatTable,
    /// Canonical index → column index in `table`.
    columns: Vec<Option<usize>>,
    /// Canonical index → expected source header that was not in the table.
    misses: Vec<(usize, &'static str)>,
}

impl<'t> CanonicalView<'t> {
    pub fn new(table: &'t SourceTable, kind: StatTable, mapping: &ColumnMapping) -> Self {
        let mut columns = Vec::with_capacity(mapping.len());
        let mut misses = Vec::new();
        for idx in 0..mapping.len() {
            let found = match mapping.resolve(idx, kind) {
                Some(col) => {
                    let at = table.column_index(col);
                    if at.is_none() {
                        misses.push((idx, col));
                    }
                    at
                }
                None => None,
            };
            columns.push(found);
        }
        Self { table, kind, columns, misses }
    }

    pub fn kind(&self) -> StatTable {
        self.kind
    }

    pub fn table(&self) -> &'t SourceTable {
        self.table
    }

    /// True if this source supplies the canonical column at `idx`.
    pub fn defines(&self, idx: usize) -> bool {
        matches!(self.columns.get(idx), Some(Some(_)))
    }

    /// Cell for (entity, canonical column); `None` when the column is not defined
    /// here or the entity has no row in this source.
    pub fn value(&self, key: &str, idx: usize) -> Option<&'t str> {
        let col = (*self.columns.get(idx)?)?;
        let row = self.table.row_for(key)?;
        row.get(col).map(String::as_str)
    }

    /// Canonical columns whose expected source header is missing from this table.
    pub fn misses(&self) -> &[(usize, &'static str)] {
        &self.misses
    }

    /// Source header backing canonical column `idx`.
    pub fn source_column(&self, idx: usize) -> Option<&'t str> {
        let col = (*self.columns.get(idx)?)?;
        self.table.headers().get(col).map(String::as_str)
    }
}
