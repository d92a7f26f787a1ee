// tests/merge_pipeline.rs
//
// End-to-end merge over saved pages: fixture directory in, results.csv out.
//
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stat_merge::config::options::{BackfillPolicy, MergeOptions, RetryPolicy};
use stat_merge::config::sources::{Catalogue, Season};
use stat_merge::render::FixtureRenderer;
use stat_merge::runner::run_merge;
use stat_merge::schema::ColumnMapping;
use stat_merge::store::{load_dataset, DataSet};
use stat_merge::Error;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("stat_merge_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// A stat table the way the site renders it: over-header, header, numbered rows.
fn stat_table(id: &str, headers: &[&str], rows: &[&[&str]]) -> String {
    let mut html = format!(r#"<div class="table_container"><table class="stats_table" id="{id}"><thead>"#);
    html.push_str(r#"<tr class="over_header"><th colspan="3"></th><th>Per 90</th></tr><tr>"#);
    for h in headers {
        html.push_str(&format!("<th scope=\"col\">{h}</th>"));
    }
    html.push_str("</tr></thead><tbody>");
    for (i, r) in rows.iter().enumerate() {
        html.push_str(&format!(r#"<tr data-row="{i}">"#));
        for (j, c) in r.iter().enumerate() {
            if j == 0 {
                html.push_str(&format!("<th>{c}</th>"));
            } else {
                html.push_str(&format!("<td><a href=\"#\">{c}</a></td>"));
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

fn write_page(dir: &Path, id: &str, body: &str) {
    fs::write(dir.join(format!("{id}.html")), format!("<html><body>{body}</body></html>")).unwrap();
}

fn standard_page() -> String {
    stat_table(
        "stats_standard",
        &["Rk", "Player", "Pos", "Squad", "Min", "Gls", "Ast", "Gls", "Ast"],
        &[
            &["1", "Declan Rice", "MF", "Arsenal", "2,900", "4", "7", "0.12", "0.22"],
            &["2", "Bukayo Saka", "FW", "Arsenal", "1,544", "6", "10", "0.35", "0.58"],
            &["3", "Bench Warmer", "DF", "Arsenal", "45", "0", "0", "0.00", "0.00"],
            &["Rk", "Player", "Pos", "Squad", "Min", "Gls", "Ast", "Gls", "Ast"],
            &["4", "David Raya", "GK", "", "3,420", "", "", "", ""],
        ],
    )
}

fn write_fixtures(dir: &Path) {
    write_page(dir, "stats_standard", &standard_page());
    // Secondary tables often ship inside comments.
    let keeper = stat_table(
        "stats_keeper",
        &["Rk", "Player", "Squad", "GA90", "Save%", "Save%"],
        &[
            &["1", "David Raya", "Other FC", "0.89", "71.2", "25.0"],
            &["2", "Ghost Keeper", "Nowhere", "2.00", "50.0", "0.0"],
        ],
    );
    write_page(dir, "stats_keeper", &format!("<!-- {keeper} -->"));
    let defense = stat_table(
        "stats_defense",
        &["Rk", "Player", "Squad", "Tkl", "Att", "Lost", "Sh", "Pass", "Int"],
        &[
            &["1", "Bukayo Saka", "Chelsea", "20", "35", "15", "3", "5", "8"],
            &["2", "Declan Rice", "Arsenal", "50", "60", "10", "9", "20", "30"],
            &["3", "Bench Warmer", "Arsenal", "1", "1", "0", "0", "0", "0"],
        ],
    );
    write_page(dir, "stats_defense", &defense);
}

fn opts(out_dir: PathBuf) -> MergeOptions {
    MergeOptions {
        retry: RetryPolicy { attempts: 2, delay: Duration::ZERO, max_wait: Duration::from_secs(1) },
        out_dir,
        ..MergeOptions::default()
    }
}

fn cell<'a>(ds: &'a DataSet, player: &str, column: &str) -> &'a str {
    let p = ds.column_index("Player").unwrap();
    let c = ds.column_index(column).unwrap();
    let row = ds.rows.iter().find(|r| r[p] == player).unwrap();
    &row[c]
}

#[test]
fn merges_fixture_pages_into_results_csv() {
    let root = tmp_dir("merge");
    let pages = root.join("pages");
    fs::create_dir_all(&pages).unwrap();
    write_fixtures(&pages);

    let catalogue = Catalogue::standard(&Season::default());
    let mapping = ColumnMapping::standard();
    let renderer = FixtureRenderer::new(&pages);
    let o = opts(root.join("out"));

    let summary = run_merge(&catalogue, &mapping, &o, &renderer, None).unwrap();
    assert_eq!(summary.players, 3);
    assert_eq!(summary.sources_used, vec!["stats_standard", "stats_keeper", "stats_defense"]);
    assert_eq!(summary.sources_skipped.len(), 5);
    assert_eq!(summary.dumps.len(), 3);
    assert!(root.join("out").join("debug_stats_keeper.csv").is_file());

    let ds = load_dataset(&summary.output).unwrap();
    let headers = ds.headers.clone().unwrap();
    assert_eq!(headers.len(), mapping.len() + 1);
    assert_eq!(headers[0], "Player");
    assert_eq!(headers[1], "Nation");

    // Primary scope: minutes filter and no outsiders.
    let players: Vec<&str> = ds.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(players, vec!["Bukayo Saka", "David Raya", "Declan Rice"]);
    assert!(ds.rows.iter().all(|r| r.len() == headers.len()));

    // Primary values are final; later Squad columns never replace them. The column
    // already has values, so Raya's blank is not backfilled either.
    assert_eq!(cell(&ds, "Bukayo Saka", "Team"), "Arsenal");
    assert_eq!(cell(&ds, "David Raya", "Team"), "N/a");
    assert_eq!(cell(&ds, "Bukayo Saka", "Minutes"), "1,544");
    assert_eq!(cell(&ds, "Bukayo Saka", "Gls/90"), "0.35");

    // Left-joined backfill from later sources.
    assert_eq!(cell(&ds, "David Raya", "Save%"), "71.2");
    assert_eq!(cell(&ds, "David Raya", "PK Save%"), "25.0");
    assert_eq!(cell(&ds, "Bukayo Saka", "Save%"), "N/a");
    assert_eq!(cell(&ds, "Declan Rice", "Att (Challenges)"), "60");
    assert_eq!(cell(&ds, "David Raya", "Tkl"), "N/a");
    // Pinned to possession, which was never fetched.
    assert_eq!(cell(&ds, "Declan Rice", "Att (Take-Ons)"), "N/a");

    assert!(summary.report.missing.iter().any(|(c, n)| c == "Att (Take-Ons)" && *n == 3));
    assert!(summary.report.unmapped.iter().any(|u| u.display == "Tkl" && u.source == "stats_standard"));
}

#[test]
fn per_entity_backfill_fills_cells_the_whole_column_rule_leaves_missing() {
    let root = tmp_dir("per_entity");
    let pages = root.join("pages");
    fs::create_dir_all(&pages).unwrap();
    write_fixtures(&pages);

    let catalogue = Catalogue::standard(&Season::default());
    let mapping = ColumnMapping::standard();
    let renderer = FixtureRenderer::new(&pages);

    let whole = run_merge(&catalogue, &mapping, &opts(root.join("whole")), &renderer, None).unwrap();
    let ds = load_dataset(&whole.output).unwrap();
    assert_eq!(cell(&ds, "David Raya", "Team"), "N/a");

    let mut o = opts(root.join("per"));
    o.backfill = BackfillPolicy::PerEntity;
    o.dump_sources = false;
    let per = run_merge(&catalogue, &mapping, &o, &renderer, None).unwrap();
    assert!(per.dumps.is_empty());
    let ds = load_dataset(&per.output).unwrap();
    // Keeper is the first later source with a Squad for Raya.
    assert_eq!(cell(&ds, "David Raya", "Team"), "Other FC");
    // Defense says Chelsea, but the primary already had a value.
    assert_eq!(cell(&ds, "Bukayo Saka", "Team"), "Arsenal");
    assert_eq!(cell(&ds, "Declan Rice", "Tkl"), "50");
}

#[test]
fn missing_primary_is_fatal() {
    let root = tmp_dir("no_primary");
    let pages = root.join("pages");
    fs::create_dir_all(&pages).unwrap();

    let catalogue = Catalogue::standard(&Season::default());
    let err = run_merge(
        &catalogue,
        &ColumnMapping::standard(),
        &opts(root.join("out")),
        &FixtureRenderer::new(&pages),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingPrimary(ref id) if id == "stats_standard"));
}

#[test]
fn primary_without_player_column_is_fatal() {
    let root = tmp_dir("no_player_col");
    let pages = root.join("pages");
    fs::create_dir_all(&pages).unwrap();
    let page = stat_table("stats_standard", &["Rk", "Name", "Min"], &[&["1", "A", "900"]]);
    write_page(&pages, "stats_standard", &page);

    let err = run_merge(
        &Catalogue::standard(&Season::default()),
        &ColumnMapping::standard(),
        &opts(root.join("out")),
        &FixtureRenderer::new(&pages),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingEntityColumn { .. }));
}
