// src/progress.rs
/// Lightweight progress reporting used by long-running operations (source fetches,
/// listing pages). Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One logical unit completed (a source table, a listing page).
    fn item_done(&mut self, _label: &str) {}

    /// One logical unit gave up; the run continues without it.
    fn item_failed(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
