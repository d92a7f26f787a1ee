// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    consts::*,
    options::{BackfillPolicy, MergeOptions, RetryPolicy, ValuesOptions},
    sources::{Catalogue, Season},
};
use crate::progress::Progress;
use crate::render::{FixtureRenderer, HttpRenderer, Renderer};
use crate::runner;
use crate::schema::ColumnMapping;

#[derive(Parser, Debug)]
#[command(name = "stat_merge", version)]
#[command(about = "Merge per-category player stat tables into one record per player")]
pub struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape every stat table and write the reconciled results.csv
    Merge(MergeArgs),
    /// Attach market values from the paginated listing to players over the minutes cutoff
    Values(ValuesArgs),
    /// Fit the baseline value estimator and report its hold-out error
    Estimate {
        /// Annotated table written by `values`
        #[arg(long, default_value = "out/MoreThan900mins.csv")]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,
    #[arg(long, default_value_t = RETRIES)]
    pub retries: u32,
    #[arg(long, default_value_t = RETRY_DELAY.as_secs())]
    pub retry_delay_secs: u64,
    /// How long to wait for a table to appear
    #[arg(long, default_value_t = MAX_WAIT.as_secs())]
    pub wait_secs: u64,
    /// Keep players with strictly more minutes than this
    #[arg(long, default_value_t = MIN_MINUTES)]
    pub min_minutes: i64,
    /// Fill missing cells one player at a time instead of whole columns
    #[arg(long)]
    pub per_entity_backfill: bool,
    /// Skip the debug_<table>.csv dumps
    #[arg(long)]
    pub no_dumps: bool,
    /// Read saved pages from this directory instead of the network
    #[arg(long)]
    pub fixtures: Option<PathBuf>,
    /// Accept invalid TLS certificates from the stat site
    #[arg(long)]
    pub insecure: bool,
    #[arg(long, default_value_t = DEFAULT_COMPETITION)]
    pub competition: u32,
    #[arg(long, default_value = DEFAULT_SEASON)]
    pub season: String,
    #[arg(long, default_value = DEFAULT_LEAGUE)]
    pub league: String,
}

#[derive(Args, Debug)]
pub struct ValuesArgs {
    #[arg(long, default_value = "out/results.csv")]
    pub input: PathBuf,
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,
    #[arg(long, default_value_t = VALUES_MIN_MINUTES)]
    pub min_minutes: i64,
    /// Accept a name match only above this score (0-100)
    #[arg(long, default_value_t = MATCH_THRESHOLD)]
    pub threshold: u8,
    #[arg(long, default_value_t = PAGE_DELAY.as_secs())]
    pub page_delay_secs: u64,
    #[arg(long, default_value_t = VALUES_MAX_PAGES)]
    pub max_pages: u32,
    #[arg(long, default_value = VALUES_URL)]
    pub url: String,
    #[arg(long)]
    pub fixtures: Option<PathBuf>,
    /// Accept invalid TLS certificates from the listing site
    #[arg(long)]
    pub insecure: bool,
}

impl MergeArgs {
    pub fn options(&self) -> MergeOptions {
        MergeOptions {
            season: Season {
                competition: self.competition,
                season: self.season.clone(),
                league: self.league.clone(),
            },
            retry: RetryPolicy {
                attempts: self.retries,
                delay: Duration::from_secs(self.retry_delay_secs),
                max_wait: Duration::from_secs(self.wait_secs),
            },
            min_minutes: self.min_minutes,
            backfill: if self.per_entity_backfill { BackfillPolicy::PerEntity } else { BackfillPolicy::WholeColumn },
            out_dir: self.out_dir.clone(),
            dump_sources: !self.no_dumps,
        }
    }
}

impl ValuesArgs {
    pub fn options(&self) -> ValuesOptions {
        ValuesOptions {
            input: self.input.clone(),
            out_dir: self.out_dir.clone(),
            min_minutes: self.min_minutes,
            threshold: self.threshold,
            listing_url: self.url.clone(),
            max_pages: self.max_pages,
            page_delay: Duration::from_secs(self.page_delay_secs),
            ..ValuesOptions::default()
        }
    }
}

fn renderer_for(fixtures: &Option<PathBuf>, insecure: bool) -> Box<dyn Renderer> {
    match fixtures {
        Some(dir) => Box::new(FixtureRenderer::new(dir)),
        None => Box::new(HttpRenderer::new().accept_invalid_certs(insecure)),
    }
}

/// Prints one line per finished unit to stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {label}", self.done, self.total);
    }
    fn item_failed(&mut self, label: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {label} (skipped)", self.done, self.total);
    }
}

pub fn run(cli: Cli) -> crate::error::Result<()> {
    let mut progress = ConsoleProgress::default();
    match cli.command {
        Command::Merge(args) => {
            let opts = args.options();
            let catalogue = Catalogue::standard(&opts.season);
            let mapping = ColumnMapping::standard();
            let renderer = renderer_for(&args.fixtures, args.insecure);
            let summary = runner::run_merge(&catalogue, &mapping, &opts, renderer.as_ref(), Some(&mut progress))?;
            progress.log(&format!(
                "{} players from {} sources -> {}",
                summary.players,
                summary.sources_used.len(),
                summary.output.display()
            ));
        }
        Command::Values(args) => {
            let opts = args.options();
            let renderer = renderer_for(&args.fixtures, args.insecure);
            let summary = runner::run_values(&opts, renderer.as_ref(), Some(&mut progress))?;
            progress.log(&format!(
                "{} of {} listed players matched; {} players -> {}",
                summary.matched,
                summary.listed,
                summary.players,
                summary.output.display()
            ));
        }
        Command::Estimate { input } => {
            let eval = runner::run_estimate(&input)?;
            if let Some(mae) = eval.mae {
                progress.log(&format!("Mean Absolute Error: {mae:.0} €"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_flags_map_onto_options() {
        let cli = Cli::try_parse_from([
            "stat_merge", "merge", "--retries", "3", "--retry-delay-secs", "0",
            "--min-minutes", "45", "--per-entity-backfill", "--season", "2023-2024",
        ])
        .unwrap();
        let Command::Merge(args) = cli.command else { panic!("expected merge") };
        let opts = args.options();
        assert_eq!(opts.retry.attempts, 3);
        assert!(opts.retry.delay.is_zero());
        assert_eq!(opts.min_minutes, 45);
        assert_eq!(opts.backfill, BackfillPolicy::PerEntity);
        assert_eq!(opts.season.season, "2023-2024");
        assert!(opts.dump_sources);
        assert!(!args.insecure);
    }

    #[test]
    fn insecure_is_opt_in_on_both_fetching_commands() {
        let cli = Cli::try_parse_from(["stat_merge", "merge", "--insecure"]).unwrap();
        let Command::Merge(args) = cli.command else { panic!("expected merge") };
        assert!(args.insecure);

        let cli = Cli::try_parse_from(["stat_merge", "values", "--insecure"]).unwrap();
        let Command::Values(args) = cli.command else { panic!("expected values") };
        assert!(args.insecure);

        let cli = Cli::try_parse_from(["stat_merge", "values"]).unwrap();
        let Command::Values(args) = cli.command else { panic!("expected values") };
        assert!(!args.insecure);
    }

    #[test]
    fn values_defaults() {
        let cli = Cli::try_parse_from(["stat_merge", "-v", "values"]).unwrap();
        assert!(cli.verbose);
        let Command::Values(args) = cli.command else { panic!("expected values") };
        let opts = args.options();
        assert_eq!(opts.min_minutes, 900);
        assert_eq!(opts.threshold, 70);
        assert_eq!(opts.max_pages, 22);
        assert_eq!(opts.name_col, "Player");
    }
}
