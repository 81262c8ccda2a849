// src/core/net.rs

// Blocking HTTP GET for sheet exports. One client per run.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

pub fn client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// GET `url` and return the body as text. Any non-2xx status is an error.
pub fn http_get(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::HttpStatus { url: s!(url), status: status.as_u16() });
    }
    Ok(resp.text()?)
}

