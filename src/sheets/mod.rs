// src/sheets/mod.rs
//! # Spreadsheet access
//!
//! Everything between a published spreadsheet and a [`Record`](crate::csv::Record)
//! the rest of the crate can read.
//!
//! - [`urls`] builds the three CSV export shapes Google Sheets offers
//!   (gviz query, "publish to web", plain export).
//! - [`fetch`] walks those candidates **in order, one at a time** and keeps the
//!   first non-empty parse. An empty-but-successful parse is only a fallback;
//!   fetch failures are logged and skipped.
//! - [`resolve`] maps a logical field ("venue") to whatever header a given sheet
//!   happens to use ("Campo", "Stadio", "Venue (city)") and folds two-column
//!   key/value tabs into a single record.
//!
//! Nothing here retries with backoff: a published sheet that is momentarily
//! inconsistent is handled by falling through to the next URL shape.
pub mod fetch;
pub mod resolve;
pub mod urls;

pub use fetch::{HttpFetcher, TextFetcher, fetch_preferred, fetch_sheet};
pub use resolve::{SheetLayout, key_value_record, resolve, resolve_or};
