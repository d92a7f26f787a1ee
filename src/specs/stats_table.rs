// src/specs/stats_table.rs
//! Reading a stat table region into raw headers + rows.
//!
//! - Data rows are `<tr data-row="<n>">`, kept in ascending `n` (first wins on a repeat).
//!   Anything else (over-headers, spacer rows) is decoration.
//! - Cells are `<th>` and `<td>` in order; empty text becomes the missing placeholder so
//!   every row has a well-defined width.
//! - Header row: first `<tr>` classed `thead`, else the last `<tr>` inside `<thead>`,
//!   else the first `<tr>` of the region.

use std::collections::BTreeMap;

use crate::config::consts::{MAX_DATA_ROW, MISSING};
use crate::core::html::{attr_value, elements_ci, has_class, text_of};

/// Straight off the page. Header names may repeat; widths may disagree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read(region: &str) -> RawTable {
    let trs = elements_ci(region, &["tr"]);

    let mut by_index: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (_, tr) in &trs {
        let Some(idx) = attr_value(tr, "data-row").and_then(|v| v.trim().parse::<usize>().ok()) else {
            continue;
        };
        if idx >= MAX_DATA_ROW || by_index.contains_key(&idx) {
            continue;
        }
        let cells = row_cells(tr, |_, text| if text.is_empty() { s!(MISSING) } else { text });
        if cells.len() > 1 {
            by_index.insert(idx, cells);
        }
    }

    let headers = header_row(region, &trs)
        .map(|tr| row_cells(tr, |i, text| if text.is_empty() { format!("Col_{i}") } else { text }))
        .unwrap_or_default();

    RawTable { headers, rows: by_index.into_values().collect() }
}

fn row_cells<F>(tr: &str, fill: F) -> Vec<String>
where
    F: Fn(usize, String) -> String,
{
    elements_ci(tr, &["th", "td"])
        .into_iter()
        .enumerate()
        .map(|(i, (_, cell))| fill(i, text_of(cell)))
        .collect()
}

fn header_row<'a>(region: &'a str, trs: &[(usize, &'a str)]) -> Option<&'a str> {
    if let Some((_, tr)) = trs.iter().find(|(_, tr)| has_class(tr, "thead")) {
        return Some(*tr);
    }
    if let Some((_, thead)) = elements_ci(region, &["thead"]).into_iter().next() {
        if let Some((_, tr)) = elements_ci(thead, &["tr"]).into_iter().last() {
            return Some(tr);
        }
    }
    trs.first().map(|(_, tr)| *tr)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: &str = r#"
        <table id="stats_standard">
          <thead>
            <tr class="over_header"><th></th><th colspan="3">Playing Time</th></tr>
            <tr><th>Rk</th><th>Player</th><th>Min</th><th>Gls</th><th>Gls</th></tr>
          </thead>
          <tbody>
            <tr data-row="1"><th>2</th><td><a>Bukayo Saka</a></td><td>1,544</td><td>6</td><td>0.35</td></tr>
            <tr data-row="0"><th>1</th><td>Max Aarons</td><td>90</td><td></td><td>0.00</td></tr>
            <tr class="spacer"><td colspan="5"></td></tr>
          </tbody>
        </table>"#;

    #[test]
    fn rows_follow_data_row_index_and_fill_blanks() {
        let t = read(REGION);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["1", "Max Aarons", "90", "N/a", "0.00"]);
        assert_eq!(t.rows[1][1], "Bukayo Saka");
    }

    #[test]
    fn header_falls_back_to_last_thead_row() {
        let t = read(REGION);
        assert_eq!(t.headers, vec!["Rk", "Player", "Min", "Gls", "Gls"]);
    }

    #[test]
    fn thead_classed_row_wins_and_blanks_get_col_names() {
        let region = r#"<table>
            <tr><th>Over</th></tr>
            <tr class="thead"><th>Rk</th><th></th><th>Player</th></tr>
            <tr data-row="0"><th>1</th><td>x</td><td>P</td></tr></table>"#;
        let t = read(region);
        assert_eq!(t.headers, vec!["Rk", "Col_1", "Player"]);
    }

    #[test]
    fn single_cell_rows_and_repeated_indexes_are_dropped() {
        let region = r#"<table><tr><th>Rk</th><th>Player</th></tr>
            <tr data-row="0"><td>only</td></tr>
            <tr data-row="1"><td>1</td><td>A</td></tr>
            <tr data-row="1"><td>1</td><td>B</td></tr></table>"#;
        let t = read(region);
        assert_eq!(t.rows, vec![vec![s!("1"), s!("A")]]);
    }
}
