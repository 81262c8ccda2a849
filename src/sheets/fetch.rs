// src/sheets/fetch.rs
use std::fs;

use reqwest::blocking::Client;
use tracing::{debug, info, instrument, warn};

use crate::config::options::SheetOptions;
use crate::core::net;
use crate::csv::{Record, parse_records};
use crate::error::{Error, Result};
use super::urls::candidate_sources;

/// Anything that can turn a source string into raw CSV text.
pub trait TextFetcher {
    fn fetch_text(&self, source: &str) -> Result<String>;
}

/// `http(s)://` goes over the network; `file://` and bare paths are read from disk.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(net::client()?))
    }

    /// Use a caller-built client (proxy, other timeouts, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, source: &str) -> Result<String> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return net::http_get(&self.client, source);
        }
        if source.contains("://") && !source.starts_with("file://") {
            return Err(Error::InvalidUrl(s!(source)));
        }
        let path = source.strip_prefix("file://").unwrap_or(source);
        Ok(fs::read_to_string(path)?)
    }
}

/// Try `sources` in order and return the first non-empty parse.
///
/// Failed fetches are logged and skipped. An empty but successful parse does
/// not stop the walk; the first such result is returned only if nothing later
/// produces rows. With no success at all the result is empty.
pub fn fetch_preferred(fetcher: &dyn TextFetcher, sources: &[Option<String>]) -> Vec<Record> {
    let mut empty_success: Option<Vec<Record>> = None;

    for (slot, source) in sources.iter().enumerate() {
        let Some(url) = source.as_deref() else { continue };

        let text = match fetcher.fetch_text(url) {
            Ok(t) => t,
            Err(e) => {
                warn!(slot, url, error = %e, "fetch failed; trying next source");
                continue;
            }
        };

        let records = parse_records(&text);
        if !records.is_empty() {
            info!(slot, url, rows = records.len(), "sheet loaded");
            return records;
        }

        debug!(slot, url, "source parsed but has no rows");
        if empty_success.is_none() {
            empty_success = Some(records);
        }
    }

    empty_success.unwrap_or_default()
}

/// Build candidates from `opts` and run [`fetch_preferred`].
#[instrument(level = "info", skip_all)]
pub fn fetch_sheet(fetcher: &dyn TextFetcher, opts: &SheetOptions) -> Result<Vec<Record>> {
    let sources = candidate_sources(opts);
    if sources.iter().all(Option::is_none) {
        return Err(Error::MissingSource(s!("set a CSV URL, a sheet id, or a pub URL")));
    }
    Ok(fetch_preferred(fetcher, &sources))
}
