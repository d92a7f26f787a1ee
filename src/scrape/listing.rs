// src/scrape/listing.rs
use std::thread;
use std::time::Duration;

use crate::render::{RegionRequest, RenderError, Renderer};
use crate::progress::Progress;
use crate::specs::transfers;

pub use crate::specs::transfers::ListingEntry;

/// Page `n` of a paginated listing: the base locator for page 1, `<base>/<n>` after.
pub fn page_locator(base: &str, page: u32) -> String {
    let base = base.trim_end_matches('/');
    if page <= 1 { s!(base) } else { format!("{base}/{page}") }
}

/// Walk the listing pages in order, one session for the whole walk, with a fixed
/// pause before each page. Stops at the first page that is missing, empty, or a
/// repeat of the previous one. A failed walk returns what was collected so far.
pub fn collect_listing(
    renderer: &dyn Renderer,
    base: &str,
    region: &str,
    max_pages: u32,
    page_delay: Duration,
    max_wait: Duration,
    mut progress: Option<&mut dyn Progress>,
) -> Vec<ListingEntry> {
    let mut entries: Vec<ListingEntry> = Vec::new();

    let mut session = match renderer.open() {
        Ok(s) => s,
        Err(e) => {
            loge!("Listing: could not open a session: {e}");
            return entries;
        }
    };

    if let Some(p) = progress.as_deref_mut() {
        p.begin(max_pages as usize);
    }

    let mut previous: Vec<ListingEntry> = Vec::new();
    for page in 1..=max_pages {
        if !page_delay.is_zero() {
            thread::sleep(page_delay);
        }
        let locator = page_locator(base, page);
        let req = RegionRequest { locator: &locator, region, max_wait };

        let markup = match session.region_html(&req) {
            Ok(m) => m,
            Err(RenderError::NotFound) => {
                logf!("Listing: no table on page {page}, stopping");
                break;
            }
            Err(e) => {
                logw!("Listing: page {page} failed ({e}), stopping");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&locator);
                }
                break;
            }
        };

        let batch = transfers::parse_listing(&markup);
        if batch.is_empty() {
            logf!("Listing: page {page} has no entries, stopping");
            break;
        }
        if batch == previous {
            logf!("Listing: page {page} repeats page {}, stopping", page - 1);
            break;
        }

        entries.extend(batch.iter().cloned());
        logf!("Listing: collected {} entries after page {page}", entries.len());
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&locator);
        }
        previous = batch;
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    entries
}
