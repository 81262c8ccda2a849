// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = concat!("matchday/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
pub const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";
pub const DEFAULT_GID: &str = "0";

// Match metadata
pub const DEFAULT_HOME_TEAM: &str = "Petriolese";
pub const DEFAULT_META_PATH: &str = "data/match.json";
pub const DEFAULT_LOGOS_DIR: &str = "logos";
pub const LOGO_EXT: &str = "webp";
pub const DEFAULT_KICKOFF_HOUR: u32 = 15;

// Poster
pub const DEFAULT_TEMPLATE: &str = "src/template.html";
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_SPONSOR_DIR: &str = "assets/sponsor";
pub const SPONSOR_HREF_PREFIX: &str = "../assets/sponsor/";
pub const SPONSOR_EXTS: &[&str] = &["webp", "png", "jpg", "jpeg", "svg"];
pub const DEFAULT_BROWSER: &str = "chromium";

// Share image
pub const TARGET_WIDTH: u32 = 1080;
pub const TARGET_HEIGHT: u32 = 1920;
pub const DEFAULT_BACKGROUND: &str = "#0b0c11";
pub const DEFAULT_FILE_PREFIX: &str = "share";
pub const DEFAULT_QUALITY: f32 = 0.95;
pub const DEFAULT_MIN_SCALE: f64 = 1.0;
/// Under the system temp dir; holds the file handed to a share command.
pub const SHARE_SCRATCH_DIR: &str = "matchday-share";

// Social openers
pub const INSTAGRAM_WEB: &str = "https://www.instagram.com/";
pub const INSTAGRAM_APP: &str = "instagram://app";
pub const WHATSAPP_WEB: &str = "https://www.whatsapp.com/";
pub const FALLBACK_DELAY_MS: u64 = 700;
pub const FALLBACK_WINDOW_MS: u64 = 1600;
