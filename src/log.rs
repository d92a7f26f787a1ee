// src/log.rs
use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

pub use tracing;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber once. `RUST_LOG` wins over `verbose` when set.
/// Output goes to stderr so CSV written to stdout (if ever) stays clean.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let default = if verbose { "stat_merge=debug,info" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default));

        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
