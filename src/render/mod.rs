// src/render/mod.rs
//! Rendering boundary: "open a session, load a page, hand back one table region".
//!
//! A `Session` is single-use state (cookies, connections, a browser tab…). The
//! extractor opens a fresh one per attempt and drops it at the end of that attempt,
//! whatever the outcome, so nothing from a failed attempt leaks into the next.

use std::time::Duration;

use thiserror::Error;

mod fixture;
mod http;

pub use fixture::FixtureRenderer;
pub use http::HttpRenderer;

/// Per-attempt failure classes. Logged differently, retried identically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("timed out waiting for the table region")]
    Timeout,
    #[error("table region not present on the page")]
    NotFound,
    #[error("render failed: {0}")]
    Other(String),
}

/// One page-region request.
#[derive(Clone, Copy, Debug)]
pub struct RegionRequest<'a> {
    pub locator: &'a str,
    pub region: &'a str,
    pub max_wait: Duration,
}

pub trait Session {
    /// Load `req.locator` and return the outer markup of `req.region`.
    fn region_html(&mut self, req: &RegionRequest<'_>) -> Result<String, RenderError>;
}

pub trait Renderer {
    /// Acquire a fresh session. Released when the returned box is dropped.
    fn open(&self) -> Result<Box<dyn Session + '_>, RenderError>;
}
