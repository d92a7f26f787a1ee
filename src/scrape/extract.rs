// src/scrape/extract.rs
use std::thread;

use crate::config::options::RetryPolicy;
use crate::render::{RegionRequest, RenderError, Renderer};

/// Fetches one table region with a bounded retry budget.
///
/// Every attempt opens its own session and drops it before the attempt returns,
/// on success and on every failure class. Exhausting the budget is not an error:
/// the caller gets `None` and treats the source as contributing nothing.
pub struct Extractor<'r> {
    renderer: &'r dyn Renderer,
    policy: RetryPolicy,
}

impl<'r> Extractor<'r> {
    pub fn new(renderer: &'r dyn Renderer, policy: RetryPolicy) -> Self {
        Self { renderer, policy }
    }

    pub fn extract(&self, locator: &str, region: &str) -> Option<String> {
        let req = RegionRequest { locator, region, max_wait: self.policy.max_wait };
        let attempts = self.policy.attempts.max(1);

        logf!("Scraping {locator} for table {region}");
        for attempt in 1..=attempts {
            match self.attempt(&req) {
                Ok(markup) => {
                    logd!("{region}: got {} bytes on attempt {attempt}/{attempts}", markup.len());
                    return Some(markup);
                }
                Err(RenderError::Timeout) => {
                    logw!("Timeout waiting for table at {locator} (attempt {attempt}/{attempts})");
                }
                Err(RenderError::NotFound) => {
                    logw!("Table with id {region} not found at {locator} (attempt {attempt}/{attempts})");
                }
                Err(RenderError::Other(msg)) => {
                    logw!("Error scraping {locator}: {msg} (attempt {attempt}/{attempts})");
                }
            }
            if attempt < attempts && !self.policy.delay.is_zero() {
                thread::sleep(self.policy.delay);
            }
        }

        loge!("{region}: giving up after {attempts} attempts");
        None
    }

    /// One attempt, scoped to one session.
    fn attempt(&self, req: &RegionRequest<'_>) -> Result<String, RenderError> {
        let mut session = self.renderer.open()?;
        session.region_html(req)
        // session dropped here on every path
    }
}
