// src/market.rs
//! Market-value path: scope the merged table by minutes, attach listing prices through
//! fuzzy identity resolution, and feed the priced rows to a value estimator.

use std::collections::HashMap;

use crate::config::consts::VALUE_COL;
use crate::core::sanitize::parse_grouped_int;
use crate::error::Result;
use crate::resolve::IdentityResolver;
use crate::specs::transfers::ListingEntry;
use crate::store::DataSet;

/* ---------------- Money ---------------- */

/// "€45.5M" → 45_500_000, "€750K" → 750_000, "€1" → 1. `None` for blank or unparseable text.
pub fn parse_money(text: &str) -> Option<i64> {
    let t: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '$' | '£'))
        .collect();
    if t.is_empty() {
        return None;
    }
    let (num, scale) = match t.as_bytes()[t.len() - 1] {
        b'M' | b'm' => (&t[..t.len() - 1], 1_000_000.0),
        b'K' | b'k' => (&t[..t.len() - 1], 1_000.0),
        _ => (t.as_str(), 1.0),
    };
    let v: f64 = num.parse().ok()?;
    Some((v * scale).round() as i64)
}

/* ---------------- Scoping ---------------- */

/// Rows with more than `min_minutes`. The minutes cells are rewritten as plain integers.
pub fn filter_by_minutes(mut ds: DataSet, minutes_col: &str, min_minutes: i64) -> Result<DataSet> {
    let col = ds.require_column(minutes_col)?;
    let before = ds.rows.len();
    ds.rows.retain_mut(|row| {
        let Some(cell) = row.get_mut(col) else { return false };
        let minutes = parse_grouped_int(cell);
        *cell = minutes.to_string();
        minutes > min_minutes
    });
    logf!("{} of {before} players over {min_minutes} minutes", ds.rows.len());
    Ok(ds)
}

/* ---------------- Annotation ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotation {
    pub matched: usize,
    pub unresolved: Vec<String>,
}

/// Append the `Transfer values` column. Each listing name is resolved against the
/// table's names; a later listing entry for the same player replaces an earlier one.
/// Players nobody resolved to get an empty cell.
pub fn annotate_values(
    ds: &mut DataSet,
    name_col: &str,
    entries: &[ListingEntry],
    threshold: u8,
) -> Result<Annotation> {
    let col = ds.require_column(name_col)?;
    let names: Vec<String> = ds.rows.iter().map(|r| r.get(col).cloned().unwrap_or_default()).collect();
    let resolver = IdentityResolver::with_threshold(names.iter().cloned(), threshold);

    let mut price_of: HashMap<String, String> = HashMap::new();
    let mut out = Annotation::default();
    for entry in entries {
        match resolver.resolve(&entry.name) {
            Some(m) => {
                logd!("{} → {} ({})", entry.name, m.key, m.score);
                price_of.insert(m.key, entry.price.clone());
                out.matched += 1;
            }
            None => {
                logw!("No matching player for {}", entry.name);
                out.unresolved.push(entry.name.clone());
            }
        }
    }

    let values = names
        .iter()
        .map(|n| price_of.get(n).cloned().unwrap_or_default())
        .collect();
    ds.push_column(VALUE_COL, values);
    Ok(out)
}

/* ---------------- Features ---------------- */

pub const NUMERIC_FEATURES: [&str; 7] = ["Age", "Minutes", "Goals", "Assists", "GCA", "PrgR (Receiving)", "Tkl"];
pub const POSITION_FEATURE: &str = "Position";

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRow {
    pub position: String,
    pub numeric: [f64; NUMERIC_FEATURES.len()],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    pub targets: Vec<f64>,
}

/// "24-117" → 24. Leading digits only; nothing parseable → 0.
fn leading_int(s: &str) -> f64 {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<f64>().unwrap_or(0.0)
}

fn numeric(s: &str) -> f64 {
    let t: String = s.trim().chars().filter(|c| *c != ',').collect();
    t.parse::<f64>().unwrap_or(0.0)
}

impl FeatureTable {
    /// Priced rows of an annotated table. Rows without a parseable value are left out.
    pub fn from_dataset(ds: &DataSet) -> Result<Self> {
        let value_col = ds.require_column(VALUE_COL)?;
        let pos_col = ds.require_column(POSITION_FEATURE)?;
        let cols = NUMERIC_FEATURES
            .iter()
            .map(|n| ds.require_column(n))
            .collect::<Result<Vec<usize>>>()?;

        let mut table = FeatureTable::default();
        for row in &ds.rows {
            let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
            let Some(value) = parse_money(cell(value_col)) else { continue };

            let mut numeric_row = [0.0; NUMERIC_FEATURES.len()];
            for (slot, (&c, name)) in numeric_row.iter_mut().zip(cols.iter().zip(NUMERIC_FEATURES)) {
                *slot = if name == "Age" { leading_int(cell(c)) } else { numeric(cell(c)) };
            }
            table.rows.push(FeatureRow { position: s!(cell(pos_col)), numeric: numeric_row });
            table.targets.push(value as f64);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Deterministic split: every fifth row is held out.
    pub fn split_holdout(&self) -> (FeatureTable, FeatureTable) {
        let mut train = FeatureTable::default();
        let mut test = FeatureTable::default();
        for (i, (r, t)) in self.rows.iter().zip(&self.targets).enumerate() {
            let side = if i % 5 == 4 { &mut test } else { &mut train };
            side.rows.push(r.clone());
            side.targets.push(*t);
        }
        (train, test)
    }
}

/* ---------------- Estimation ---------------- */

/// Black-box value model: fit on priced rows, predict a value for one row.
pub trait Estimator {
    fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]);
    fn predict(&self, row: &FeatureRow) -> f64;
}

/// Mean value per position, global mean for positions never seen in training.
#[derive(Clone, Debug, Default)]
pub struct PositionMeanEstimator {
    by_position: HashMap<String, f64>,
    global: f64,
}

impl Estimator for PositionMeanEstimator {
    fn fit(&mut self, rows: &[FeatureRow], targets: &[f64]) {
        let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
        for (r, &t) in rows.iter().zip(targets) {
            let e = sums.entry(r.position.clone()).or_insert((0.0, 0));
            e.0 += t;
            e.1 += 1;
        }
        self.by_position = sums.into_iter().map(|(k, (s, n))| (k, s / n as f64)).collect();
        self.global = if targets.is_empty() { 0.0 } else { targets.iter().sum::<f64>() / targets.len() as f64 };
    }

    fn predict(&self, row: &FeatureRow) -> f64 {
        self.by_position.get(&row.position).copied().unwrap_or(self.global)
    }
}

pub fn mean_absolute_error(model: &dyn Estimator, test: &FeatureTable) -> Option<f64> {
    if test.is_empty() {
        return None;
    }
    let total: f64 = test
        .rows
        .iter()
        .zip(&test.targets)
        .map(|(r, t)| (model.predict(r) - t).abs())
        .sum();
    Some(total / test.len() as f64)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub train: usize,
    pub test: usize,
    pub mae: Option<f64>,
}

/// Fit `model` on the training split and score it on the hold-out.
pub fn evaluate(model: &mut dyn Estimator, table: &FeatureTable) -> Evaluation {
    let (train, test) = table.split_holdout();
    model.fit(&train.rows, &train.targets);
    Evaluation { train: train.len(), test: test.len(), mae: mean_absolute_error(model, &test) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_normalization() {
        assert_eq!(parse_money("€45.5M"), Some(45_500_000));
        assert_eq!(parse_money("€750K"), Some(750_000));
        assert_eq!(parse_money("€1"), Some(1));
        assert_eq!(parse_money(" € 0.4M "), Some(400_000));
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("€"), None);
        assert_eq!(parse_money("n/a"), None);
    }

    fn ds(rows: &[&[&str]]) -> DataSet {
        DataSet {
            headers: Some(
                ["Player", "Position", "Age", "Minutes", "Goals", "Assists", "GCA", "PrgR (Receiving)", "Tkl"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            rows: rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
        }
    }

    #[test]
    fn minutes_filter_is_strict_and_normalizes() {
        let d = ds(&[
            &["A", "FW", "24-100", "1,544", "1", "1", "1", "1", "1"],
            &["B", "DF", "30-1", "900", "0", "0", "0", "0", "0"],
            &["C", "MF", "21-5", "N/a", "0", "0", "0", "0", "0"],
        ]);
        let out = filter_by_minutes(d, "Minutes", 900).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0][3], "1544");
        assert!(filter_by_minutes(DataSet::default(), "Minutes", 900).is_err());
    }

    #[test]
    fn later_listing_entries_win_and_misses_stay_empty() {
        let mut d = ds(&[
            &["Bukayo Saka", "FW", "23-1", "2000", "6", "10", "15", "300", "20"],
            &["Declan Rice", "MF", "26-1", "2500", "4", "7", "9", "150", "50"],
        ]);
        let entries = vec![
            ListingEntry { name: s!("Bukayo Saka"), price: s!("€100M") },
            ListingEntry { name: s!("bukayo saka"), price: s!("€120M") },
            ListingEntry { name: s!("Nobody Known"), price: s!("€1M") },
        ];
        let a = annotate_values(&mut d, "Player", &entries, 70).unwrap();
        assert_eq!(a.matched, 2);
        assert_eq!(a.unresolved, vec!["Nobody Known"]);
        let v = d.require_column(VALUE_COL).unwrap();
        assert_eq!(d.rows[0][v], "€120M");
        assert_eq!(d.rows[1][v], "");
    }

    #[test]
    fn features_skip_unpriced_rows_and_baseline_scores() {
        let mut d = ds(&[
            &["A", "FW", "24-100", "2000", "10", "5", "12", "200", "10"],
            &["B", "FW", "22-1", "1500", "6", "2", "8", "150", "5"],
            &["C", "DF", "30-1", "2500", "1", "1", "2", "20", "60"],
            &["D", "DF", "N/a", "1800", "0", "0", "1", "10", "40"],
            &["E", "FW", "25-1", "1000", "2", "2", "3", "50", "5"],
            &["F", "GK", "28-1", "3000", "0", "0", "0", "0", "0"],
        ]);
        d.push_column(VALUE_COL, ["€80M", "€40M", "€20M", "€10M", "€60M", ""].iter().map(|s| s.to_string()).collect());

        let t = FeatureTable::from_dataset(&d).unwrap();
        assert_eq!(t.len(), 5);
        assert_eq!(t.rows[0].numeric[0], 24.0);
        assert_eq!(t.rows[3].numeric[0], 0.0);

        let mut model = PositionMeanEstimator::default();
        let eval = evaluate(&mut model, &t);
        assert_eq!((eval.train, eval.test), (4, 1));
        // FW mean over A and B is 60M; E is worth 60M.
        assert_eq!(eval.mae, Some(0.0));
    }
}
