// src/error.rs
use thiserror::Error;

/// Fatal conditions for a run. Per-source extraction failures are NOT errors;
/// they surface as `None` from the extractor and the source simply contributes nothing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Primary source {0} yielded no usable rows")]
    MissingPrimary(String),

    #[error("Source {source_id} has no '{column}' column")]
    MissingEntityColumn { source_id: String, column: String },

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
