// src/share/stage.rs
use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Local, NaiveDate};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, instrument};

use crate::config::consts::DEFAULT_FILE_PREFIX;
use crate::config::options::ShareOptions;
use crate::core::sanitize::sanitize_file_stem;
use crate::error::Result;
use super::compose::{ImageKind, ScaleParams, capture_scale, compose, encode, parse_hex_color};
use super::dispatch::{Downloader, ShareFile, ShareMetadata, ShareOutcome, ShareTarget, dispatch};

/// What the stage is asked to rasterise at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureRequest {
    pub scale: f64,
    pub background: Rgba<u8>,
}

/// The region being exported.
pub trait Stage {
    /// Laid-out size in CSS pixels; `(0, 0)` when not laid out.
    fn bounds(&self) -> (f64, f64);
    fn device_pixel_ratio(&self) -> f64 { 1.0 }
    fn capture(&mut self, request: &CaptureRequest) -> Result<DynamicImage>;
    fn add_class(&mut self, _class: &str) {}
    fn remove_class(&mut self, _class: &str) {}
}

/// Something with a `visibility` style that is hidden while capturing.
pub trait Decoration {
    /// Inline value, `None` when unset.
    fn visibility(&self) -> Option<String>;
    /// `None` removes the inline value.
    fn set_visibility(&mut self, value: Option<&str>);
}

/* ---------------- Guards ---------------- */

/// Hides decorations on creation and restores their previous inline
/// visibility on drop, on every exit path.
pub struct HiddenDecorations<'a, 'b> {
    elements: &'a mut [&'b mut dyn Decoration],
    previous: Vec<Option<String>>,
}

impl<'a, 'b> HiddenDecorations<'a, 'b> {
    pub fn hide(elements: &'a mut [&'b mut dyn Decoration]) -> Self {
        let mut previous = Vec::with_capacity(elements.len());
        for el in elements.iter_mut() {
            previous.push(el.visibility());
            el.set_visibility(Some("hidden"));
        }
        Self { elements, previous }
    }
}

impl Drop for HiddenDecorations<'_, '_> {
    fn drop(&mut self) {
        for (el, prev) in self.elements.iter_mut().zip(self.previous.iter()) {
            match prev.as_deref().filter(|v| !v.is_empty()) {
                Some(v) => el.set_visibility(Some(v)),
                None => el.set_visibility(None),
            }
        }
    }
}

/// Adds a class to the stage for the duration of the capture.
pub struct CaptureClass<'s, S: Stage + ?Sized> {
    stage: &'s mut S,
    class: Option<String>,
}

impl<'s, S: Stage + ?Sized> CaptureClass<'s, S> {
    pub fn apply(stage: &'s mut S, class: Option<&str>) -> Self {
        let class = class.filter(|c| !c.is_empty()).map(str::to_string);
        if let Some(c) = &class {
            stage.add_class(c);
        }
        Self { stage, class }
    }

    pub fn stage(&mut self) -> &mut S {
        &mut *self.stage
    }
}

impl<S: Stage + ?Sized> Drop for CaptureClass<'_, S> {
    fn drop(&mut self) {
        if let Some(c) = &self.class {
            self.stage.remove_class(c);
        }
    }
}

/* ---------------- File-backed stage ---------------- */

/// A stage whose "screen" content is an already-rendered raster.
///
/// Bounds are the raster size divided by `device_pixel_ratio`; capturing
/// resamples that CSS-pixel size by the requested scale and flattens onto
/// the background.
pub struct ImageStage {
    image: DynamicImage,
    dpr: f64,
    classes: BTreeSet<String>,
}

impl ImageStage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image, dpr: 1.0, classes: BTreeSet::new() }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(image::open(path)?))
    }

    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl Stage for ImageStage {
    fn bounds(&self) -> (f64, f64) {
        (self.image.width() as f64 / self.dpr, self.image.height() as f64 / self.dpr)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn capture(&mut self, request: &CaptureRequest) -> Result<DynamicImage> {
        let (w, h) = self.bounds();
        let out_w = (w * request.scale).round().max(1.0) as u32;
        let out_h = (h * request.scale).round().max(1.0) as u32;

        let src = self.image.to_rgba8();
        let scaled = if (out_w, out_h) == src.dimensions() {
            src
        } else {
            imageops::resize(&src, out_w, out_h, FilterType::Lanczos3)
        };

        let mut flat = RgbaImage::from_pixel(out_w, out_h, request.background);
        imageops::overlay(&mut flat, &scaled, 0, 0);
        Ok(DynamicImage::ImageRgba8(flat))
    }

    fn add_class(&mut self, class: &str) {
        self.classes.insert(s!(class));
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }
}

/* ---------------- Handler ---------------- */

/// `<prefix>_<YYYY-MM-DD>.<ext>`, prefix reduced to a safe file stem.
pub fn default_file_name(prefix: &str, date: NaiveDate, kind: ImageKind) -> String {
    let base = sanitize_file_stem(prefix, DEFAULT_FILE_PREFIX);
    format!("{base}_{}.{}", date.format("%Y-%m-%d"), kind.ext())
}

pub fn resolve_file_name(options: &ShareOptions, today: NaiveDate) -> String {
    match options.file_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => s!(name),
        None => default_file_name(&options.file_name_prefix, today, options.kind),
    }
}

/// Capture → compose → encode → share-or-download for one stage.
pub struct StageShareHandler<S: Stage> {
    stage: S,
    options: ShareOptions,
    target: Box<dyn ShareTarget>,
    downloader: Box<dyn Downloader>,
}

impl<S: Stage> StageShareHandler<S> {
    pub fn new(
        stage: S,
        options: ShareOptions,
        target: Box<dyn ShareTarget>,
        downloader: Box<dyn Downloader>,
    ) -> Self {
        Self { stage, options, target, downloader }
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn options(&self) -> &ShareOptions {
        &self.options
    }

    /// Share with the handler's own options.
    pub fn share(&mut self, decorations: &mut [&mut dyn Decoration]) -> Result<ShareOutcome> {
        let options = self.options.clone();
        self.share_with(&options, decorations)
    }

    /// Share with per-call options.
    ///
    /// `decorations` are hidden and the capture class applied for the whole
    /// call; both are undone whichever way it returns.
    #[instrument(level = "info", skip_all, fields(w = options.target_width, h = options.target_height, fit = ?options.fit))]
    pub fn share_with(
        &mut self,
        options: &ShareOptions,
        decorations: &mut [&mut dyn Decoration],
    ) -> Result<ShareOutcome> {
        let _hidden = HiddenDecorations::hide(decorations);
        let mut staged = CaptureClass::apply(&mut self.stage, options.capture_class.as_deref());

        let background = parse_hex_color(&options.background)?;
        let stage = staged.stage();
        let (stage_w, stage_h) = stage.bounds();
        let scale = capture_scale(&ScaleParams {
            stage_width: stage_w,
            stage_height: stage_h,
            target_width: options.target_width,
            target_height: options.target_height,
            device_pixel_ratio: stage.device_pixel_ratio(),
            min_scale: options.min_scale,
            max_scale: options.max_scale,
        });
        debug!(scale, stage_w, stage_h, "capturing stage");

        let raster = stage.capture(&CaptureRequest { scale, background })?;
        let canvas = compose(&raster, options.target_width, options.target_height, background, options.fit);
        let bytes = encode(&canvas, options.kind, options.quality)?;

        let file = ShareFile {
            name: resolve_file_name(options, Local::now().date_naive()),
            mime: s!(options.kind.mime()),
            bytes,
        };
        let meta = ShareMetadata {
            title: options.share_title.clone(),
            text: options.share_text.clone(),
        };
        dispatch(&file, &meta, self.target.as_mut(), self.downloader.as_mut())
    }
}
