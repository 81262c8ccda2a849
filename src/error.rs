// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between fetching a sheet and writing an image.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from a sheet endpoint.
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The composed canvas could not be turned into an image blob.
    #[error("could not encode image: {0}")]
    Encode(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    /// Every source was empty or failed.
    #[error("sheet is empty")]
    EmptySheet,

    #[error("no usable row in sheet")]
    NoValidRow,

    /// Neither a CSV URL nor a sheet id + gid were configured.
    #[error("no sheet source configured: {0}")]
    MissingSource(String),

    #[error("share failed: {0}")]
    Share(String),

    #[error("render failed: {0}")]
    Render(String),

    /// Empty, `.`/`..`, or nothing left once directories are stripped.
    #[error("invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
