// src/report.rs
//! Post-merge diagnostics. Nothing here changes the output.

use crate::config::consts::MISSING;
use crate::merge::Unmapped;
use crate::store::DataSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub unmapped: Vec<Unmapped>,
    /// (column, count of missing-sentinel cells), only columns with at least one.
    pub missing: Vec<(String, usize)>,
}

impl Report {
    pub fn build(table: &DataSet, unmapped: &[Unmapped]) -> Self {
        Self { unmapped: unmapped.to_vec(), missing: missing_counts(table) }
    }

    pub fn log(&self) {
        if !self.unmapped.is_empty() {
            logf!("Unmapped columns:");
            for u in &self.unmapped {
                logf!("  {} ({}) not found in {}", u.display, u.column, u.source);
            }
        }
        if !self.missing.is_empty() {
            logf!("Summary of '{MISSING}' columns:");
            for (col, n) in &self.missing {
                logf!("  {col}: {n} '{MISSING}' values");
            }
        }
    }
}

pub fn missing_counts(table: &DataSet) -> Vec<(String, usize)> {
    let Some(headers) = &table.headers else { return Vec::new() };
    headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let n = table
                .rows
                .iter()
                .filter(|r| r.get(i).map(|v| v == MISSING).unwrap_or(false))
                .count();
            (n > 0).then(|| (h.clone(), n))
        })
        .collect()
}
