// src/lib.rs
//! Match-sheet tooling for the club website.
//!
//! Layers, bottom up:
//! - [`csv`] parses delimited text into ordered [`csv::Record`]s.
//! - [`sheets`] builds spreadsheet export URLs, walks the source fallback chain
//!   and resolves logical fields from arbitrary headers.
//! - [`meta`], [`dates`] and [`logos`] turn a sheet row into `match.json`.
//! - [`poster`] fills the HTML template and drives a headless browser.
//! - [`share`] composes a captured stage onto a fixed canvas and shares or
//!   downloads the encoded image.

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod csv;
pub mod dates;
pub mod error;
pub mod file;
pub mod log;
pub mod logos;
pub mod meta;
pub mod poster;
pub mod progress;
pub mod share;
pub mod sheets;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
