// src/merge.rs
//! Fold per-source canonical views into one row per primary-source player.
//!
//! The primary source fixes the row set. Every canonical column starts as the
//! missing sentinel; the primary fills what it has, and later sources are consulted
//! in catalogue order under the configured `BackfillPolicy`. A cell holding a real
//! value is never overwritten.

use crate::config::consts::{ENTITY_COL, MINUTES_COL, MISSING};
use crate::config::options::BackfillPolicy;
use crate::core::sanitize::{first_token, parse_grouped_int};
use crate::schema::{CanonicalView, ColumnMapping};
use crate::store::DataSet;
use crate::table::SourceTable;

/// A canonical column whose expected header was not found in a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unmapped {
    pub display: String,
    pub column: String,
    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// `Player` first, then the canonical columns in schema order.
    pub table: DataSet,
    pub unmapped: Vec<Unmapped>,
}

/// Primary-source rows with more than `min_minutes` played. Minutes are read from
/// the `Min` column with `,` grouping removed; unparseable values count as 0.
pub fn scope_primary(primary: SourceTable, min_minutes: i64) -> SourceTable {
    let Some(min_col) = primary.column_index(MINUTES_COL) else {
        logw!("{}: no '{MINUTES_COL}' column, minutes filter skipped", primary.source());
        return primary;
    };
    let before = primary.len();
    let scoped = primary.retain_rows(|_, row| {
        row.get(min_col).map(|m| parse_grouped_int(m)).unwrap_or(0) > min_minutes
    });
    logf!(
        "{}: {} of {before} players over {min_minutes} minutes",
        scoped.source(),
        scoped.len()
    );
    scoped
}

fn is_missing(v: &str) -> bool {
    v == MISSING
}

/// Merge `views[0]` (primary, already scoped) with the later views.
pub fn merge(views: &[CanonicalView<'_>], mapping: &ColumnMapping, policy: BackfillPolicy) -> MergeOutcome {
    let width = mapping.len();
    let Some((primary, later)) = views.split_first() else {
        return MergeOutcome {
            table: DataSet { headers: Some(output_headers(mapping)), rows: Vec::new() },
            unmapped: Vec::new(),
        };
    };

    let keys: Vec<&str> = primary.table().keys().collect();
    let mut grid: Vec<Vec<String>> = vec![vec![s!(MISSING); width]; keys.len()];
    let mut unmapped: Vec<Unmapped> = Vec::new();
    let names: Vec<&'static str> = mapping.display_names().collect();

    // Primary: take every column it defines.
    let primary_id = primary.table().source();
    for c in 0..width {
        if !primary.defines(c) {
            continue;
        }
        for (e, key) in keys.iter().enumerate() {
            if let Some(v) = primary.value(key, c) {
                grid[e][c] = s!(v);
            }
        }
        logd!("Mapped {} to {} from {primary_id}", names[c], primary.source_column(c).unwrap_or(""));
    }
    for &(c, col) in primary.misses() {
        logd!("Column {col} not found in {primary_id} for {}", names[c]);
        unmapped.push(Unmapped { display: s!(names[c]), column: s!(col), source: s!(primary_id) });
    }

    // Later sources, in priority order.
    for view in later {
        let source_id = view.table().source();
        for c in 0..width {
            if !view.defines(c) {
                continue;
            }
            match policy {
                BackfillPolicy::WholeColumn => {
                    if !grid.iter().all(|r| is_missing(&r[c])) {
                        logd!("Skipping {} as it was already mapped", names[c]);
                        continue;
                    }
                    for (e, key) in keys.iter().enumerate() {
                        grid[e][c] = view.value(key, c).map(String::from).unwrap_or_else(|| s!(MISSING));
                    }
                    logd!("Mapped {} to {} from {source_id}", names[c], view.source_column(c).unwrap_or(""));
                }
                BackfillPolicy::PerEntity => {
                    let mut filled = 0usize;
                    for (e, key) in keys.iter().enumerate() {
                        if !is_missing(&grid[e][c]) {
                            continue;
                        }
                        if let Some(v) = view.value(key, c).filter(|v| !is_missing(v)) {
                            grid[e][c] = s!(v);
                            filled += 1;
                        }
                    }
                    if filled > 0 {
                        logd!("Filled {filled} cells of {} from {source_id}", names[c]);
                    }
                }
            }
        }
        for &(c, col) in view.misses() {
            logd!("Column {col} not found in {source_id} for {}", names[c]);
            if grid.iter().all(|r| is_missing(&r[c])) {
                unmapped.push(Unmapped { display: s!(names[c]), column: s!(col), source: s!(source_id) });
            }
        }
    }

    // Pinned columns no fetched source could supply: name the table that would have.
    for (c, spec) in mapping.specs().iter().enumerate() {
        if !grid.iter().all(|r| is_missing(&r[c])) || unmapped.iter().any(|u| u.display == names[c]) {
            continue;
        }
        for (table, col) in spec.overrides {
            logd!("Column {col} not available from {table} for {}", names[c]);
            unmapped.push(Unmapped { display: s!(names[c]), column: s!(*col), source: table.to_string() });
        }
    }

    // Stable sort by first name token; ties keep primary order.
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| first_token(keys[a]).cmp(first_token(keys[b])));

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(keys.len());
    for i in order {
        let mut row = Vec::with_capacity(width + 1);
        row.push(s!(keys[i]));
        row.append(&mut grid[i]);
        rows.push(row);
    }

    MergeOutcome {
        table: DataSet { headers: Some(output_headers(mapping)), rows },
        unmapped,
    }
}

fn output_headers(mapping: &ColumnMapping) -> Vec<String> {
    std::iter::once(s!(ENTITY_COL))
        .chain(mapping.display_names().map(String::from))
        .collect()
}
