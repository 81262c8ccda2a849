// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::share::compose::{FitMode, ImageKind};

/// Where the match sheet lives. Any subset may be set; the fetcher builds
/// candidate URLs from whatever is present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetOptions {
    /// Explicit CSV URL (or local path), tried before the derived ones.
    pub csv_url: Option<String>,
    pub file_id: Option<String>,
    pub gid: Option<String>,
    /// A `.../pubhtml?gid=N` link from "Publish to the web".
    pub pub_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaOptions {
    pub match_index: Option<usize>,
    pub default_home: String,
    pub logos_dir: String,
    /// Tab holding `Squadra` / `Logo` columns, same spreadsheet.
    pub opponents_gid: Option<String>,
    pub out: PathBuf,
}

impl Default for MetaOptions {
    fn default() -> Self {
        Self {
            match_index: None,
            default_home: s!(DEFAULT_HOME_TEAM),
            logos_dir: s!(DEFAULT_LOGOS_DIR),
            opponents_gid: None,
            out: PathBuf::from(DEFAULT_META_PATH),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShareOptions {
    pub target_width: u32,
    pub target_height: u32,
    /// CSS-style hex colour, see [`crate::share::compose::parse_hex_color`].
    pub background: String,
    pub file_name_prefix: String,
    /// Overrides the `<prefix>_<date>.<ext>` default.
    pub file_name: Option<String>,
    pub capture_class: Option<String>,
    pub kind: ImageKind,
    /// 0.0..=1.0, only used by lossy encoders.
    pub quality: f32,
    pub share_title: String,
    pub share_text: String,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
    pub fit: FitMode,
}

impl Default for ShareOptions {
    fn default() -> Self {
        Self {
            target_width: TARGET_WIDTH,
            target_height: TARGET_HEIGHT,
            background: s!(DEFAULT_BACKGROUND),
            file_name_prefix: s!(DEFAULT_FILE_PREFIX),
            file_name: None,
            capture_class: None,
            kind: ImageKind::Png,
            quality: DEFAULT_QUALITY,
            share_title: s!(),
            share_text: s!(),
            min_scale: Some(DEFAULT_MIN_SCALE),
            max_scale: None,
            fit: FitMode::Contain,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PosterOptions {
    pub data: PathBuf,
    pub template: PathBuf,
    pub dist: PathBuf,
    pub sponsor_dir: PathBuf,
}

impl Default for PosterOptions {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_META_PATH),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            dist: PathBuf::from(DEFAULT_DIST_DIR),
            sponsor_dir: PathBuf::from(DEFAULT_SPONSOR_DIR),
        }
    }
}
