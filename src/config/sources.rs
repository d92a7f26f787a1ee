// src/config/sources.rs
//! The fixed catalogue of stat pages, in merge priority order.
//!
//! The first entry is the primary source: its player list defines the output scope.
//! Later entries only backfill canonical columns the primary did not supply.

use std::collections::HashSet;
use std::fmt;

use crate::config::consts::STATS_HOST;
use crate::error::{Error, Result};

/// One stat category page. The region id doubles as the source identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatTable {
    Standard,
    Keeper,
    Shooting,
    Passing,
    Gca,
    Defense,
    Possession,
    Misc,
}

impl StatTable {
    pub const ALL: [StatTable; 8] = [
        StatTable::Standard,
        StatTable::Keeper,
        StatTable::Shooting,
        StatTable::Passing,
        StatTable::Gca,
        StatTable::Defense,
        StatTable::Possession,
        StatTable::Misc,
    ];

    /// Table region id on the page (`<table id="...">`).
    pub fn region_id(&self) -> &'static str {
        match self {
            StatTable::Standard   => "stats_standard",
            StatTable::Keeper     => "stats_keeper",
            StatTable::Shooting   => "stats_shooting",
            StatTable::Passing    => "stats_passing",
            StatTable::Gca        => "stats_gca",
            StatTable::Defense    => "stats_defense",
            StatTable::Possession => "stats_possession",
            StatTable::Misc       => "stats_misc",
        }
    }

    /// Path segment of the category page.
    fn page_segment(&self) -> &'static str {
        match self {
            StatTable::Standard   => "stats",
            StatTable::Keeper     => "keepers",
            StatTable::Shooting   => "shooting",
            StatTable::Passing    => "passing",
            StatTable::Gca        => "gca",
            StatTable::Defense    => "defense",
            StatTable::Possession => "possession",
            StatTable::Misc       => "misc",
        }
    }
}

impl fmt::Display for StatTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region_id())
    }
}

/// Which competition season the catalogue points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Season {
    pub competition: u32,
    pub season: String,
    pub league: String,
}

impl Default for Season {
    fn default() -> Self {
        use crate::config::consts::{DEFAULT_COMPETITION, DEFAULT_LEAGUE, DEFAULT_SEASON};
        Self {
            competition: DEFAULT_COMPETITION,
            season: s!(DEFAULT_SEASON),
            league: s!(DEFAULT_LEAGUE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub table: StatTable,
    pub locator: String,
}

impl Source {
    pub fn new(table: StatTable, season: &Season) -> Self {
        let locator = format!(
            "{}/en/comps/{}/{}/{}/{}-{}-Stats#{}",
            STATS_HOST,
            season.competition,
            season.season,
            table.page_segment(),
            season.season,
            season.league,
            table.region_id(),
        );
        Self { table, locator }
    }

    pub fn region(&self) -> &'static str {
        self.table.region_id()
    }
}

/// Ordered sources; index 0 is primary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalogue {
    sources: Vec<Source>,
}

impl Catalogue {
    /// All eight categories for one season, standard stats first.
    pub fn standard(season: &Season) -> Self {
        Self {
            sources: StatTable::ALL.iter().map(|t| Source::new(*t, season)).collect(),
        }
    }

    /// Build from an explicit list and validate it.
    pub fn from_sources(sources: Vec<Source>) -> Result<Self> {
        let cat = Self { sources };
        cat.validate()?;
        Ok(cat)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(Error::Config(s!("source catalogue is empty")));
        }
        let mut seen = HashSet::new();
        for (i, src) in self.sources.iter().enumerate() {
            if src.locator.trim().is_empty() {
                return Err(Error::Config(format!("source #{i} ({}) has an empty locator", src.table)));
            }
            if !seen.insert(src.table) {
                return Err(Error::Config(format!("source {} listed more than once", src.table)));
            }
        }
        Ok(())
    }

    pub fn primary(&self) -> &Source {
        &self.sources[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
