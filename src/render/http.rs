// src/render/http.rs
// Plain HTTP fetch. Good enough for pages that ship their tables in the initial
// document (including the commented-out ones); no script execution.

use reqwest::blocking::Client;

use super::{RegionRequest, RenderError, Renderer, Session};
use crate::config::consts::USER_AGENT;
use crate::core::html::find_region;

pub struct HttpRenderer {
    user_agent: String,
    accept_invalid_certs: bool,
}

impl HttpRenderer {
    pub fn new() -> Self {
        Self { user_agent: s!(USER_AGENT), accept_invalid_certs: false }
    }

    /// Skip TLS certificate checks. Off unless asked for (`--insecure`).
    pub fn accept_invalid_certs(mut self, yes: bool) -> Self {
        self.accept_invalid_certs = yes;
        self
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HttpRenderer {
    fn open(&self) -> Result<Box<dyn Session + '_>, RenderError> {
        // New client per session: no pooled connections or cookies carried over.
        if self.accept_invalid_certs {
            logw!("TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .user_agent(self.user_agent.as_str())
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| RenderError::Other(e.to_string()))?;
        logd!("http session opened");
        Ok(Box::new(HttpSession { client }))
    }
}

struct HttpSession {
    client: Client,
}

impl Session for HttpSession {
    fn region_html(&mut self, req: &RegionRequest<'_>) -> Result<String, RenderError> {
        let resp = self
            .client
            .get(req.locator)
            .timeout(req.max_wait)
            .send()
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RenderError::Other(format!("HTTP {} for {}", status, req.locator)));
        }
        let body = resp.text().map_err(classify)?;

        find_region(&body, req.region)
            .map(str::to_string)
            .ok_or(RenderError::NotFound)
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        logd!("http session released");
    }
}

fn classify(e: reqwest::Error) -> RenderError {
    if e.is_timeout() {
        RenderError::Timeout
    } else {
        RenderError::Other(e.to_string())
    }
}
