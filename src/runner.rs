// src/runner.rs
use std::path::{Path, PathBuf};

use crate::{
    config::{
        consts::{ENTITY_COL, VALUES_REGION},
        options::{MergeOptions, ValuesOptions},
        sources::{Catalogue, StatTable},
    },
    error::{Error, Result},
    file::{debug_dump_path, ensure_directory},
    market::{self, Evaluation, FeatureTable, PositionMeanEstimator},
    merge::{merge, scope_primary},
    progress::Progress,
    render::Renderer,
    report::Report,
    schema::{CanonicalView, ColumnMapping},
    scrape::{collect_listing, Extractor},
    store::{load_dataset, save_dataset},
    table::{self, SourceTable, Unusable},
};

/// What a merge run produced.
#[derive(Debug)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub dumps: Vec<PathBuf>,
    pub players: usize,
    pub sources_used: Vec<String>,
    pub sources_skipped: Vec<String>,
    pub report: Report,
}

/* ---------------- Merge ---------------- */

/// Fetch every catalogue source in order, normalize, merge, write `results.csv`.
///
/// A later source that cannot be fetched or has no usable table is skipped. The
/// primary source failing either way ends the run.
pub fn run_merge(
    catalogue: &Catalogue,
    mapping: &ColumnMapping,
    opts: &MergeOptions,
    renderer: &dyn Renderer,
    mut progress: Option<&mut dyn Progress>,
) -> Result<MergeSummary> {
    catalogue.validate()?;
    ensure_directory(&opts.out_dir)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(catalogue.len());
    }

    let extractor = Extractor::new(renderer, opts.retry);
    let primary_id = catalogue.primary().table.region_id();

    let mut tables: Vec<(StatTable, SourceTable)> = Vec::with_capacity(catalogue.len());
    let mut dumps = Vec::new();
    let mut skipped = Vec::new();

    for (i, src) in catalogue.iter().enumerate() {
        let id = src.table.region_id();
        let is_primary = i == 0;

        let Some(markup) = extractor.extract(&src.locator, id) else {
            if is_primary {
                return Err(Error::MissingPrimary(s!(id)));
            }
            logw!("Skipping {} due to missing table", src.locator);
            if let Some(p) = progress.as_deref_mut() {
                p.item_failed(id);
            }
            skipped.push(s!(id));
            continue;
        };

        let table = match table::normalize(&markup, id) {
            Ok(t) => t,
            Err(Unusable::NoRows) if is_primary => return Err(Error::MissingPrimary(s!(id))),
            Err(Unusable::NoEntityColumn) if is_primary => {
                return Err(Error::MissingEntityColumn { source_id: s!(id), column: s!(ENTITY_COL) });
            }
            Err(why) => {
                logw!("Skipping {id}: {why:?}");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(id);
                }
                skipped.push(s!(id));
                continue;
            }
        };

        if opts.dump_sources {
            dumps.push(save_dataset(&debug_dump_path(&opts.out_dir, id), &table.to_dataset())?);
        }
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(id);
        }
        tables.push((src.table, table));
    }

    // Primary scope: minutes filter before anything is merged.
    let mut iter = tables.into_iter();
    let Some((primary_kind, primary)) = iter.next() else {
        return Err(Error::MissingPrimary(s!(primary_id)));
    };
    let primary = scope_primary(primary, opts.min_minutes);
    if primary.is_empty() {
        logw!("{primary_id}: no players left after the minutes filter");
    }
    let rest: Vec<(StatTable, SourceTable)> = iter.collect();

    let mut views = Vec::with_capacity(rest.len() + 1);
    views.push(CanonicalView::new(&primary, primary_kind, mapping));
    views.extend(rest.iter().map(|(kind, t)| CanonicalView::new(t, *kind, mapping)));

    let outcome = merge(&views, mapping, opts.backfill);
    let output = save_dataset(&opts.results_path(), &outcome.table)?;
    logf!("Data saved to {}", output.display());

    let report = Report::build(&outcome.table, &outcome.unmapped);
    report.log();

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    Ok(MergeSummary {
        output,
        dumps,
        players: outcome.table.rows.len(),
        sources_used: views.iter().map(|v| s!(v.table().source())).collect(),
        sources_skipped: skipped,
        report,
    })
}

/* ---------------- Values ---------------- */

#[derive(Debug)]
pub struct ValuesSummary {
    pub output: PathBuf,
    pub players: usize,
    pub listed: usize,
    pub matched: usize,
    pub unresolved: Vec<String>,
}

/// Scope the merged table by minutes, walk the value listing, attach prices.
pub fn run_values(
    opts: &ValuesOptions,
    renderer: &dyn Renderer,
    progress: Option<&mut dyn Progress>,
) -> Result<ValuesSummary> {
    let ds = load_dataset(&opts.input)?;
    let mut ds = market::filter_by_minutes(ds, &opts.minutes_col, opts.min_minutes)?;
    ds.require_column(&opts.name_col)?;

    let entries = collect_listing(
        renderer,
        &opts.listing_url,
        VALUES_REGION,
        opts.max_pages,
        opts.page_delay,
        opts.max_wait,
        progress,
    );
    logf!("Collected {} listing entries", entries.len());

    let ann = market::annotate_values(&mut ds, &opts.name_col, &entries, opts.threshold)?;
    let output = save_dataset(&opts.out_path(), &ds)?;
    logf!("Data saved to {}", output.display());

    Ok(ValuesSummary {
        output,
        players: ds.rows.len(),
        listed: entries.len(),
        matched: ann.matched,
        unresolved: ann.unresolved,
    })
}

/* ---------------- Estimate ---------------- */

/// Fit the baseline estimator on an annotated table and score it on the hold-out rows.
pub fn run_estimate(input: &Path) -> Result<Evaluation> {
    let ds = load_dataset(input)?;
    let features = FeatureTable::from_dataset(&ds)?;
    if features.is_empty() {
        return Err(Error::Input(format!("{}: no rows with a transfer value", input.display())));
    }
    let mut model = PositionMeanEstimator::default();
    let eval = market::evaluate(&mut model, &features);
    match eval.mae {
        Some(mae) => logf!("Mean Absolute Error: {mae:.0} € ({} train / {} test)", eval.train, eval.test),
        None => logw!("Too few priced rows for a hold-out ({} total)", features.len()),
    }
    Ok(eval)
}
