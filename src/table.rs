// src/table.rs
//
// Row normalizer: raw region markup → SourceTable.
//
// - Column names are made unique the way the site itself disambiguates repeats
//   (`Cmp%`, `Cmp%_1`, `Cmp%_2` …), so mapping tables can name them directly.
// - Header and row widths are reconciled against the widest data row.
// - Entity keys are cleaned, header-repeat rows dropped, and key collisions
//   collapsed to the first occurrence.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{ENTITY_COL, MISSING};
use crate::core::sanitize::clean_entity_key;
use crate::specs::stats_table::{self, RawTable};
use crate::store::DataSet;

/// Why a region produced no table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unusable {
    NoRows,
    NoEntityColumn,
}

/// One source's table after normalization. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceTable {
    source: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    entity_col: usize,
    index: HashMap<String, usize>,
}

impl SourceTable {
    pub fn source(&self) -> &str { &self.source }
    pub fn headers(&self) -> &[String] { &self.headers }
    pub fn rows(&self) -> &[Vec<String>] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Entity keys in row order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |r| r[self.entity_col].as_str())
    }

    /// Row for an entity key, if this source has one.
    pub fn row_for(&self, key: &str) -> Option<&[String]> {
        self.index.get(key).map(|&i| self.rows[i].as_slice())
    }

    /// Keep only rows passing `keep`. Used for the minutes filter on the primary.
    pub fn retain_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&SourceTable, &[String]) -> bool,
    {
        let rows = std::mem::take(&mut self.rows);
        let kept: Vec<Vec<String>> = rows.into_iter().filter(|r| keep(&self, r.as_slice())).collect();
        self.rows = kept;
        self.index = build_index(&self.rows, self.entity_col);
        self
    }

    pub fn to_dataset(&self) -> DataSet {
        DataSet { headers: Some(self.headers.clone()), rows: self.rows.clone() }
    }
}

/// Region markup → normalized table for `source`.
pub fn normalize(region: &str, source: &str) -> Result<SourceTable, Unusable> {
    from_raw(stats_table::read(region), source)
}

pub fn from_raw(raw: RawTable, source: &str) -> Result<SourceTable, Unusable> {
    let RawTable { headers, rows } = raw;
    if rows.is_empty() {
        return Err(Unusable::NoRows);
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let headers = dedupe_names(&fit_headers(headers, width));

    let entity_col = headers
        .iter()
        .position(|h| h == ENTITY_COL)
        .ok_or(Unusable::NoEntityColumn)?;

    let mut kept: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for mut row in rows {
        row.resize(width, s!(MISSING));
        let raw_name = row[entity_col].trim();
        if raw_name.is_empty() || raw_name == MISSING || raw_name == ENTITY_COL {
            continue; // blank or header-repeat row
        }
        let key = clean_entity_key(raw_name);
        if key.is_empty() {
            continue;
        }
        row[entity_col] = key;
        kept.push(row);
    }

    let rows = collapse_duplicate_keys(kept, &headers, entity_col, source);
    if rows.is_empty() {
        return Err(Unusable::NoRows);
    }

    let index = build_index(&rows, entity_col);
    logd!("{source}: {} rows, columns {:?}", rows.len(), headers);

    Ok(SourceTable { source: s!(source), headers, rows, entity_col, index })
}

/// Pad short headers with `Col_<i>`, truncate long ones.
fn fit_headers(mut headers: Vec<String>, width: usize) -> Vec<String> {
    if headers.len() > width {
        headers.truncate(width);
    }
    while headers.len() < width {
        headers.push(format!("Col_{}", headers.len()));
    }
    headers
}

/// `Name`, `Name_1`, `Name_2` … in first-seen order; always pairwise unique.
pub fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut repeats: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if used.insert(name.clone()) {
            out.push(name.clone());
            continue;
        }
        let n = repeats.entry(name.as_str()).or_insert(0);
        let fresh = loop {
            *n += 1;
            let candidate = format!("{name}_{n}");
            if !used.contains(&candidate) {
                break candidate;
            }
        };
        used.insert(fresh.clone());
        out.push(fresh);
    }
    out
}

/// Keep the first row per key; log every collision with enough context to tell
/// the rows apart.
fn collapse_duplicate_keys(
    rows: Vec<Vec<String>>,
    headers: &[String],
    entity_col: usize,
    source: &str,
) -> Vec<Vec<String>> {
    let mut first_at: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    let mut collisions: Vec<usize> = Vec::new();
    for (i, r) in rows.iter().enumerate() {
        if first_at.contains_key(&r[entity_col]) {
            collisions.push(i);
        } else {
            first_at.insert(r[entity_col].clone(), i);
        }
    }
    if collisions.is_empty() {
        return rows;
    }

    let context: Vec<usize> = ["Squad", "Pos"]
        .iter()
        .filter_map(|c| headers.iter().position(|h| h == c))
        .collect();
    let describe = |r: &[String]| -> String {
        let mut parts = vec![r[entity_col].clone()];
        parts.extend(context.iter().map(|&c| r[c].clone()));
        parts.join(" / ")
    };

    let dup_keys: HashSet<&str> = collisions.iter().map(|&i| rows[i][entity_col].as_str()).collect();
    let details: Vec<String> = rows
        .iter()
        .filter(|r| dup_keys.contains(r[entity_col].as_str()))
        .map(|r| describe(r))
        .collect();
    logw!("Duplicate players in {source}: {:?}", dup_keys.iter().collect::<Vec<_>>());
    logw!("Duplicate details: {:?}", details);

    let drop: HashSet<usize> = collisions.into_iter().collect();
    rows.into_iter()
        .enumerate()
        .filter(|(i, _)| !drop.contains(i))
        .map(|(_, r)| r)
        .collect()
}

fn build_index(rows: &[Vec<String>], entity_col: usize) -> HashMap<String, usize> {
    rows.iter()
        .enumerate()
        .map(|(i, r)| (r[entity_col].clone(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
        }
    }

    #[test]
    fn duplicate_headers_get_counters_in_order() {
        let names: Vec<String> = ["Cmp", "Att", "Cmp%", "Cmp", "Cmp%", "Cmp%"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dedupe_names(&names), vec!["Cmp", "Att", "Cmp%", "Cmp_1", "Cmp%_1", "Cmp%_2"]);
    }

    #[test]
    fn dedupe_never_reuses_an_existing_name() {
        let names: Vec<String> = ["A", "A_1", "A", "A"].iter().map(|s| s.to_string()).collect();
        let out = dedupe_names(&names);
        let uniq: HashSet<&String> = out.iter().collect();
        assert_eq!(uniq.len(), out.len());
        assert_eq!(out, vec!["A", "A_1", "A_2", "A_3"]);
    }

    #[test]
    fn header_width_follows_widest_row() {
        let t = from_raw(raw(&["Rk", "Player"], &[&["1", "A", "x"], &["2", "B"]]), "s").unwrap();
        assert_eq!(t.headers(), &["Rk", "Player", "Col_2"]);
        assert_eq!(t.rows()[1], vec!["2", "B", "N/a"]);

        let t = from_raw(raw(&["Rk", "Player", "Min", "Extra"], &[&["1", "A", "90"]]), "s").unwrap();
        assert_eq!(t.headers(), &["Rk", "Player", "Min"]);
    }

    #[test]
    fn drops_blank_and_header_repeat_rows_and_cleans_keys() {
        let t = from_raw(
            raw(
                &["Rk", "Player", "Squad"],
                &[&["1", "N'Golo Kanté", "X"], &["Rk", "Player", "Squad"], &["2", "N/a", "Y"], &["3", "  ", "Z"]],
            ),
            "s",
        )
        .unwrap();
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["NGolo Kanté"]);
        assert!(t.row_for("NGolo Kanté").is_some());
    }

    #[test]
    fn key_collisions_keep_first_occurrence() {
        let t = from_raw(
            raw(
                &["Player", "Squad", "Min"],
                &[&["Ben Davies", "Tottenham", "400"], &["Joe", "A", "1"], &["Ben Davies", "Liverpool", "0"]],
            ),
            "s",
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.row_for("Ben Davies").unwrap()[1], "Tottenham");
    }

    #[test]
    fn unusable_tables_are_signalled() {
        assert_eq!(from_raw(raw(&["Player"], &[]), "s").unwrap_err(), Unusable::NoRows);
        assert_eq!(
            from_raw(raw(&["Rk", "Name"], &[&["1", "A"]]), "s").unwrap_err(),
            Unusable::NoEntityColumn
        );
        assert_eq!(
            from_raw(raw(&["Rk", "Player"], &[&["1", "Player"]]), "s").unwrap_err(),
            Unusable::NoRows
        );
    }
}
