// src/poster.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::consts::{SPONSOR_EXTS, SPONSOR_HREF_PREFIX};
use crate::config::options::PosterOptions;
use crate::error::{Error, Result};
use crate::file;
use crate::meta::{MatchMeta, read_meta};
use crate::progress::Progress;
use crate::share::compose::{ImageKind, encode};

const WEBP_QUALITY: f32 = 0.9;

/* ---------------- Sponsors ---------------- */

fn is_sponsor_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SPONSOR_EXTS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// Image files in `dir`. Names listed in `order` (`a.webp|b.png`) that exist
/// come first, in that order; everything else follows alphabetically.
pub fn list_sponsors(dir: &Path, order: &str) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            if dir.exists() { warn!(dir = %dir.display(), error = %e, "cannot read sponsor dir"); }
            return Vec::new();
        }
    };

    let mut all: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| is_sponsor_file(n))
        .collect();
    all.sort();

    let mut out: Vec<String> = Vec::with_capacity(all.len());
    for wanted in order.split('|').map(str::trim).filter(|w| !w.is_empty()) {
        if all.iter().any(|a| a == wanted) && !out.iter().any(|o| o == wanted) {
            out.push(s!(wanted));
        }
    }
    for name in all {
        if !out.contains(&name) { out.push(name); }
    }
    out
}

pub fn sponsor_grid_html(sponsors: &[String]) -> String {
    sponsors
        .iter()
        .map(|f| format!(r#"<div class="s-item"><img src="{SPONSOR_HREF_PREFIX}{f}" alt=""></div>"#))
        .collect()
}

/* ---------------- Template ---------------- */

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("static regex"))
}

fn display_value(v: &Value) -> String {
    match v {
        Value::Null => s!(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace every `{{key}}` with `data[key]`; unknown keys become `""`.
pub fn fill_template(tpl: &str, data: &Map<String, Value>) -> String {
    placeholder()
        .replace_all(tpl, |c: &Captures<'_>| data.get(&c[1]).map(display_value).unwrap_or_default())
        .into_owned()
}

/// Template variables: every `match.json` field plus `SPONSOR_GRID`.
pub fn template_data(meta: &MatchMeta, sponsor_grid: &str) -> Result<Map<String, Value>> {
    let mut data = match serde_json::to_value(meta)? {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    data.insert(s!("SPONSOR_GRID"), Value::String(s!(sponsor_grid)));
    Ok(data)
}

/* ---------------- Variants ---------------- */

/// One output size. Social sizes override the template's `--W`/`--H`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PosterVariant {
    pub html_name: &'static str,
    pub stem: &'static str,
    pub width: u32,
    pub height: u32,
    pub inject_size: bool,
}

pub const VARIANTS: &[PosterVariant] = &[
    PosterVariant { html_name: "poster.html", stem: "poster-a4-3508x2480", width: 2480, height: 3508, inject_size: false },
    PosterVariant { html_name: "poster-1080x1350.html", stem: "social-1080x1350", width: 1080, height: 1350, inject_size: true },
    PosterVariant { html_name: "poster-1080x1080.html", stem: "social-1080x1080", width: 1080, height: 1080, inject_size: true },
];

/// Prepend the size variables to the first `:root{` block.
pub fn inject_size(html: &str, width: u32, height: u32) -> String {
    html.replacen(":root{", &format!(":root{{ --W:{width}px; --H:{height}px;"), 1)
}

/* ---------------- Screenshots ---------------- */

/// Renders an HTML file to a PNG of exactly `width × height`.
pub trait Screenshotter {
    fn screenshot(&mut self, html: &Path, width: u32, height: u32, out_png: &Path) -> Result<()>;
}

/// A Chromium-compatible binary in headless screenshot mode.
#[derive(Clone, Debug)]
pub struct HeadlessBrowser {
    pub program: String,
}

impl HeadlessBrowser {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Screenshotter for HeadlessBrowser {
    fn screenshot(&mut self, html: &Path, width: u32, height: u32, out_png: &Path) -> Result<()> {
        let html_abs = fs::canonicalize(html)?;
        let out = std::path::absolute(out_png)?;

        let status = Command::new(&self.program)
            .arg("--headless")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg("--force-device-scale-factor=1")
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--screenshot={}", out.display()))
            .arg(format!("file://{}", html_abs.display()))
            .status()
            .map_err(|e| Error::Render(format!("cannot start {}: {e}", self.program)))?;

        if !status.success() {
            return Err(Error::Render(format!("{} exited with {status}", self.program)));
        }
        if !out.is_file() {
            return Err(Error::Render(format!("no screenshot at {}", out.display())));
        }
        Ok(())
    }
}

/* ---------------- Pipeline ---------------- */

fn render_variant(
    dist: &Path,
    filled: &str,
    v: &PosterVariant,
    shooter: &mut dyn Screenshotter,
) -> Result<Vec<PathBuf>> {
    let html = if v.inject_size { inject_size(filled, v.width, v.height) } else { s!(filled) };
    let html_path = dist.join(v.html_name);
    file::write_text(&html_path, &html)?;

    let png = dist.join(format!("{}.png", v.stem));
    shooter.screenshot(&html_path, v.width, v.height, &png)?;

    let webp = dist.join(format!("{}.webp", v.stem));
    let bytes = encode(&image::open(&png)?.to_rgba8(), ImageKind::WebP, WEBP_QUALITY)?;
    fs::write(&webp, bytes)?;
    debug!(stem = v.stem, "variant rendered");

    Ok(vec![html_path, png, webp])
}

/// Fill the template from `match.json` and render every [`VARIANTS`] entry
/// into `dist`. Returns the files written.
#[instrument(level = "info", skip_all, fields(dist = %opts.dist.display()))]
pub fn render_posters(
    opts: &PosterOptions,
    shooter: &mut dyn Screenshotter,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<PathBuf>> {
    file::ensure_directory(&opts.dist)?;
    let meta = read_meta(&opts.data)?;
    let sponsors = list_sponsors(&opts.sponsor_dir, &meta.sponsor_csv);
    let data = template_data(&meta, &sponsor_grid_html(&sponsors))?;
    let tpl = fs::read_to_string(&opts.template)?;
    let filled = fill_template(&tpl, &data);

    if let Some(p) = progress.as_deref_mut() {
        p.begin(VARIANTS.len());
        p.log(&format!("{} sponsor logo(s)", sponsors.len()));
    }

    let mut written = Vec::with_capacity(VARIANTS.len() * 3);
    let mut result = Ok(());
    for v in VARIANTS {
        match render_variant(&opts.dist, &filled, v, shooter) {
            Ok(files) => {
                written.extend(files);
                if let Some(p) = progress.as_deref_mut() { p.item_done(v.stem); }
            }
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() { p.finish(); }
    result?;
    info!(files = written.len(), "posters rendered");
    Ok(written)
}
