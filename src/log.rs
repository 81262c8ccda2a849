// src/log.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Error, Result};

const DEFAULT_FILTER: &str = "info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Timestamps are elapsed time since start-up. With `log_file` set, lines are
/// appended to that file (no ANSI colours) instead of going to stderr.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let builder = fmt()
        .with_env_filter(filter())
        .with_timer(fmt::time::uptime())
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    crate::file::ensure_directory(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| Error::Logging(e.to_string()))
}
