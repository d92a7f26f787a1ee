// src/specs/mod.rs
//! # Page “specs”
//!
//! Page-specific knowledge of *where the data lives in the markup* and *how to read
//! it robustly*. Each spec turns one table region into plain strings.
//!
//! ## What lives here
//! - **Pure markup reading** of an already-extracted region (no fetching).
//! - **Row and header selection rules** (e.g. stat rows carry `data-row="<n>"`,
//!   the header is the `thead`-classed row).
//! - **Light shaping** into a headers + rows bundle.
//!
//! ## What does **not** live here
//! - Fetching and retries (`scrape`), column-name dedup and entity cleanup
//!   (`table`), canonical mapping and merging (`schema`, `merge`).
//!
//! ## Typical call chain
//! ```text
//! runner → scrape::Extractor::extract → region markup
//!        → table::normalize → specs::stats_table::read → RawTable
//! ```
//!
//! ## Testing notes
//! - Specs are testable **offline** against captured fixtures (saved HTML).
pub mod stats_table;
pub mod transfers;
