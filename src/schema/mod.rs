// src/schema/mod.rs
//! Canonical output schema and the static canonical-name → source-column mapping.
//!
//! Most canonical columns carry the same header in every stat table and are tried
//! against each source in turn. Columns whose header is ambiguous across tables
//! (`Att` in defense vs. possession, the repeated `Cmp%` in passing, ...) are pinned to
//! one table through overrides, so they can never be picked up from the wrong page.

use crate::config::sources::StatTable;

mod view;

pub use view::CanonicalView;

/// Where one canonical column comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub display: &'static str,
    /// Header tried against every source without an override.
    pub default: Option<&'static str>,
    /// Source-specific headers. An override replaces the default for that source.
    pub overrides: &'static [(StatTable, &'static str)],
}

impl ColumnSpec {
    const fn any(display: &'static str, column: &'static str) -> Self {
        Self { display, default: Some(column), overrides: &[] }
    }

    const fn pinned(display: &'static str, overrides: &'static [(StatTable, &'static str)]) -> Self {
        Self { display, default: None, overrides }
    }

    /// Source column for `table`, if this canonical column is defined there at all.
    pub fn column_for(&self, table: StatTable) -> Option<&'static str> {
        self.overrides
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, c)| *c)
            .or(self.default)
    }
}

use StatTable::*;

const STANDARD_SCHEMA: &[ColumnSpec] = &[
    ColumnSpec::any("Nation", "Nation"),
    ColumnSpec::any("Team", "Squad"),
    ColumnSpec::any("Position", "Pos"),
    ColumnSpec::any("Age", "Age"),
    ColumnSpec::any("Matches Played", "MP"),
    ColumnSpec::any("Starts", "Starts"),
    ColumnSpec::any("Minutes", "Min"),
    ColumnSpec::any("Goals", "Gls"),
    ColumnSpec::any("Assists", "Ast"),
    ColumnSpec::any("Yellow Cards", "CrdY"),
    ColumnSpec::any("Red Cards", "CrdR"),
    ColumnSpec::any("xG", "xG"),
    ColumnSpec::any("xAG", "xAG"),
    ColumnSpec::any("PrgC", "PrgC"),
    ColumnSpec::any("PrgP", "PrgP"),
    ColumnSpec::any("PrgR", "PrgR"),
    ColumnSpec::pinned("Gls/90", &[(Standard, "Gls_1")]),
    ColumnSpec::pinned("Ast/90", &[(Standard, "Ast_1")]),
    ColumnSpec::pinned("xG/90", &[(Standard, "xG_1")]),
    ColumnSpec::pinned("xAG/90", &[(Standard, "xAG_1")]),
    ColumnSpec::any("GA90", "GA90"),
    ColumnSpec::any("Save%", "Save%"),
    ColumnSpec::any("CS%", "CS%"),
    ColumnSpec::pinned("PK Save%", &[(Keeper, "Save%_1")]),
    ColumnSpec::any("SoT%", "SoT%"),
    ColumnSpec::any("SoT/90", "SoT/90"),
    ColumnSpec::any("G/Sh", "G/Sh"),
    ColumnSpec::any("Dist", "Dist"),
    ColumnSpec::any("Cmp", "Cmp"),
    ColumnSpec::any("Cmp%", "Cmp%"),
    ColumnSpec::any("TotDist", "TotDist"),
    ColumnSpec::pinned("Short Cmp%", &[(Passing, "Cmp%_1")]),
    ColumnSpec::pinned("Medium Cmp%", &[(Passing, "Cmp%_2")]),
    ColumnSpec::pinned("Long Cmp%", &[(Passing, "Cmp%_3")]),
    ColumnSpec::any("KP", "KP"),
    ColumnSpec::pinned("1/3", &[(Passing, "1/3")]),
    ColumnSpec::any("PPA", "PPA"),
    ColumnSpec::any("CrsPA", "CrsPA"),
    ColumnSpec::pinned("PrgP (Passing)", &[(Passing, "PrgP")]),
    ColumnSpec::any("SCA", "SCA"),
    ColumnSpec::any("SCA90", "SCA90"),
    ColumnSpec::any("GCA", "GCA"),
    ColumnSpec::any("GCA90", "GCA90"),
    ColumnSpec::any("Tkl", "Tkl"),
    ColumnSpec::any("TklW", "TklW"),
    ColumnSpec::pinned("Att (Challenges)", &[(Defense, "Att")]),
    ColumnSpec::pinned("Lost (Challenges)", &[(Defense, "Lost")]),
    ColumnSpec::any("Blocks", "Blocks"),
    ColumnSpec::pinned("Sh (Blocks)", &[(Defense, "Sh")]),
    ColumnSpec::pinned("Pass (Blocks)", &[(Defense, "Pass")]),
    ColumnSpec::any("Int", "Int"),
    ColumnSpec::any("Touches", "Touches"),
    ColumnSpec::any("Def Pen", "Def Pen"),
    ColumnSpec::pinned("Def 3rd", &[(Possession, "Def 3rd")]),
    ColumnSpec::pinned("Mid 3rd", &[(Possession, "Mid 3rd")]),
    ColumnSpec::pinned("Att 3rd", &[(Possession, "Att 3rd")]),
    ColumnSpec::any("Att Pen", "Att Pen"),
    ColumnSpec::pinned("Att (Take-Ons)", &[(Possession, "Att")]),
    ColumnSpec::pinned("Succ% (Take-Ons)", &[(Possession, "Succ%")]),
    ColumnSpec::any("Tkld%", "Tkld%"),
    ColumnSpec::any("Carries", "Carries"),
    ColumnSpec::pinned("ProDist", &[(Possession, "PrgDist")]),
    ColumnSpec::pinned("ProgC (Carries)", &[(Possession, "PrgC")]),
    ColumnSpec::pinned("1/3 (Carries)", &[(Possession, "1/3")]),
    ColumnSpec::any("CPA", "CPA"),
    ColumnSpec::any("Mis", "Mis"),
    ColumnSpec::any("Dis", "Dis"),
    ColumnSpec::any("Rec", "Rec"),
    ColumnSpec::pinned("PrgR (Receiving)", &[(Possession, "PrgR")]),
    ColumnSpec::any("Fls", "Fls"),
    ColumnSpec::any("Fld", "Fld"),
    ColumnSpec::any("Off", "Off"),
    ColumnSpec::any("Crs", "Crs"),
    ColumnSpec::any("Recov", "Recov"),
    ColumnSpec::pinned("Won (Aerial)", &[(Misc, "Won")]),
    ColumnSpec::pinned("Lost (Aerial)", &[(Misc, "Lost")]),
    ColumnSpec::pinned("Won% (Aerial)", &[(Misc, "Won%")]),
];

/// The canonical schema: ordered display names, each with its `ColumnSpec`.
/// Built once and shared by reference for the whole run.
#[derive(Clone, Debug)]
pub struct ColumnMapping {
    specs: Vec<ColumnSpec>,
}

impl ColumnMapping {
    pub fn standard() -> Self {
        Self { specs: STANDARD_SCHEMA.to_vec() }
    }

    /// Custom schema (tests, other competitions).
    pub fn from_specs(specs: Vec<ColumnSpec>) -> Self {
        Self { specs }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    pub fn display_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|s| s.display)
    }

    pub fn position(&self, display: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.display == display)
    }

    /// Source column for the canonical column at `idx` in `table`.
    pub fn resolve(&self, idx: usize, table: StatTable) -> Option<&'static str> {
        self.specs.get(idx)?.column_for(table)
    }
}
