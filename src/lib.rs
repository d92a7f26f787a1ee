// src/lib.rs

#[macro_use]
pub mod macros;

pub mod log;
pub mod error;

pub mod config;
pub mod core;
pub mod render;
pub mod scrape;
pub mod specs;

pub mod table;
pub mod schema;
pub mod merge;
pub mod resolve;
pub mod report;
pub mod market;

pub mod csv;
pub mod file;
pub mod progress;
pub mod store;
pub mod runner;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
