// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::sanitize::sanitize_file_stem;
use crate::error::{Error, Result};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Config(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Create the parent directory of a file path if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// `<dir>/debug_<source>.csv`
pub fn debug_dump_path(dir: &Path, source: &str) -> PathBuf {
    dir.join(join!("debug_", &sanitize_file_stem(source), ".csv"))
}
