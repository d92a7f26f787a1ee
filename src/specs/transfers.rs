// src/specs/transfers.rs
//! Reading one page of the market-value listing.
//!
//! Names come from the `title` of the link inside each `div.text`; prices are the text of
//! each `span.player-tag`. The two sequences are paired by position, the way the page
//! lays them out row by row. Extra names or prices on either side are dropped.

use crate::core::html::{attr_value, class_blocks_ci, elements_ci, text_of};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub price: String,
}

pub fn parse_listing(region: &str) -> Vec<ListingEntry> {
    let names: Vec<String> = class_blocks_ci(region, "div", "text")
        .into_iter()
        .filter_map(|div| {
            let (_, a) = elements_ci(div, &["a"]).into_iter().next()?;
            attr_value(a, "title").filter(|t| !t.trim().is_empty())
        })
        .collect();

    let prices: Vec<String> = class_blocks_ci(region, "span", "player-tag")
        .into_iter()
        .map(text_of)
        .collect();

    if names.len() != prices.len() {
        logw!("Listing: {} names vs {} prices on one page", names.len(), prices.len());
    }

    names
        .into_iter()
        .zip(prices)
        .map(|(name, price)| ListingEntry { name, price })
        .collect()
}
