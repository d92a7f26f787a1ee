// src/scrape/mod.rs
mod extract;
mod listing;

pub use extract::Extractor;
pub use listing::{collect_listing, ListingEntry};
