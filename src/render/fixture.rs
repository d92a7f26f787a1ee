// src/render/fixture.rs
// Serves saved pages from disk, for offline runs and tests.
//
// Lookup: `<dir>/<region>.html`; for paginated locators ending in `/<n>`,
// `<dir>/<region>_<n>.html`. The file may be a whole page or just the region.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RegionRequest, RenderError, Renderer, Session};
use crate::core::html::find_region;

pub struct FixtureRenderer {
    dir: PathBuf,
}

impl FixtureRenderer {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn path_for(&self, req: &RegionRequest<'_>) -> PathBuf {
        let page = req
            .locator
            .rsplit('/')
            .next()
            .and_then(|last| last.parse::<u32>().ok());
        let stem = match page {
            Some(n) => format!("{}_{}", req.region, n),
            None => s!(req.region),
        };
        self.dir.join(join!(&stem, ".html"))
    }
}

impl Renderer for FixtureRenderer {
    fn open(&self) -> Result<Box<dyn Session + '_>, RenderError> {
        if !self.dir.is_dir() {
            return Err(RenderError::Other(format!(
                "fixture directory missing: {}",
                self.dir.display()
            )));
        }
        Ok(Box::new(FixtureSession { renderer: self }))
    }
}

struct FixtureSession<'a> {
    renderer: &'a FixtureRenderer,
}

impl Session for FixtureSession<'_> {
    fn region_html(&mut self, req: &RegionRequest<'_>) -> Result<String, RenderError> {
        let path = self.renderer.path_for(req);
        let doc = fs::read_to_string(&path).map_err(|_| RenderError::NotFound)?;
        find_region(&doc, req.region)
            .map(str::to_string)
            .ok_or(RenderError::NotFound)
    }
}
