// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use super::sources::Season;

/// Bounded retry budget for one table fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: RETRIES,
            delay: RETRY_DELAY,
            max_wait: MAX_WAIT,
        }
    }
}

/// How later sources may fill a canonical column the primary left missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BackfillPolicy {
    /// A column is taken whole from the first later source that maps it,
    /// and only while no entity has a value for it yet.
    #[default]
    WholeColumn,
    /// Every still-missing cell is filled from the first later source with a value for it.
    PerEntity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    pub season: Season,
    pub retry: RetryPolicy,
    pub min_minutes: i64,
    pub backfill: BackfillPolicy,
    pub out_dir: PathBuf,
    /// Write `debug_<source>.csv` for every normalized source table.
    pub dump_sources: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            season: Season::default(),
            retry: RetryPolicy::default(),
            min_minutes: MIN_MINUTES,
            backfill: BackfillPolicy::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            dump_sources: true,
        }
    }
}

impl MergeOptions {
    pub fn results_path(&self) -> PathBuf {
        self.out_dir.join(RESULTS_FILE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValuesOptions {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub name_col: String,
    pub minutes_col: String,
    pub min_minutes: i64,
    pub threshold: u8,
    pub listing_url: String,
    pub max_pages: u32,
    pub page_delay: Duration,
    pub max_wait: Duration,
}

impl Default for ValuesOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_OUT_DIR).join(RESULTS_FILE),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            name_col: s!(ENTITY_COL),
            minutes_col: s!("Minutes"),
            min_minutes: VALUES_MIN_MINUTES,
            threshold: MATCH_THRESHOLD,
            listing_url: s!(VALUES_URL),
            max_pages: VALUES_MAX_PAGES,
            page_delay: PAGE_DELAY,
            max_wait: MAX_WAIT,
        }
    }
}

impl ValuesOptions {
    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(VALUES_FILE)
    }
}
