// src/config/consts.rs
use std::time::Duration;

// Stat pages
pub const STATS_HOST: &str = "https://fbref.com";
pub const DEFAULT_COMPETITION: u32 = 9;
pub const DEFAULT_SEASON: &str = "2024-2025";
pub const DEFAULT_LEAGUE: &str = "Premier-League";

// Extraction
pub const RETRIES: u32 = 7;
pub const RETRY_DELAY: Duration = Duration::from_secs(5);
pub const MAX_WAIT: Duration = Duration::from_secs(15);
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Normalization
pub const MISSING: &str = "N/a";
pub const ENTITY_COL: &str = "Player";
pub const MINUTES_COL: &str = "Min";
pub const MAX_DATA_ROW: usize = 1000;

// Merge
pub const MIN_MINUTES: i64 = 90;

// Market values
pub const VALUES_URL: &str = "https://www.footballtransfers.com/us/players/uk-premier-league";
pub const VALUES_REGION: &str = "similar-players-table";
pub const VALUES_MIN_MINUTES: i64 = 900;
pub const VALUES_MAX_PAGES: u32 = 22;
pub const PAGE_DELAY: Duration = Duration::from_secs(2);
pub const MATCH_THRESHOLD: u8 = 70;
pub const VALUE_COL: &str = "Transfer values";

// Output
pub const DEFAULT_OUT_DIR: &str = "out";
pub const RESULTS_FILE: &str = "results.csv";
pub const VALUES_FILE: &str = "MoreThan900mins.csv";
