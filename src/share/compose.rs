// src/share/compose.rs
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// How the source raster is fitted onto the target canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Whole source visible, letterboxed with the background.
    #[default]
    Contain,
    /// Target fully covered, overflow cropped.
    Cover,
}

/// Output encoding of the share image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageKind {
    #[default]
    Png,
    Jpeg,
    /// Lossless; `quality` is ignored.
    WebP,
}

impl ImageKind {
    pub fn ext(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::WebP => "webp",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::WebP => "image/webp",
        }
    }
}

/// Placement of the scaled source on the target canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitGeometry {
    pub ratio: f64,
    pub width: u32,
    pub height: u32,
    /// Negative in cover mode: that part is cropped.
    pub offset_x: i64,
    pub offset_y: i64,
}

impl FitGeometry {
    /// Uniform scale + centering. A degenerate source (zero side, non-finite or
    /// non-positive ratio) is drawn unscaled.
    pub fn compute(src_w: u32, src_h: u32, target_w: u32, target_h: u32, mode: FitMode) -> Self {
        let rx = target_w as f64 / src_w as f64;
        let ry = target_h as f64 / src_h as f64;
        let mut ratio = match mode {
            FitMode::Contain => rx.min(ry),
            FitMode::Cover => rx.max(ry),
        };
        if !rx.is_finite() || !ry.is_finite() || !ratio.is_finite() || ratio <= 0.0 {
            ratio = 1.0;
        }

        let width = (src_w as f64 * ratio).round() as u32;
        let height = (src_h as f64 * ratio).round() as u32;
        // floor, not round: odd leftovers go to the right/bottom edge
        let offset_x = ((target_w as f64 - width as f64) / 2.0).floor() as i64;
        let offset_y = ((target_h as f64 - height as f64) / 2.0).floor() as i64;

        Self { ratio, width, height, offset_x, offset_y }
    }
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    let bad = || Error::InvalidColor(s!(s));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());

    match hex.len() {
        3 => {
            let mut px = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16).ok_or_else(bad)? as u8;
                px[i] = v * 17;
            }
            Ok(Rgba(px))
        }
        6 => Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => Err(bad()),
    }
}

/// Draw `source` onto a fresh `target_w × target_h` canvas filled with `background`.
pub fn compose(
    source: &DynamicImage,
    target_w: u32,
    target_h: u32,
    background: Rgba<u8>,
    mode: FitMode,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(target_w, target_h, background);
    let geo = FitGeometry::compute(source.width(), source.height(), target_w, target_h, mode);

    if geo.width == 0 || geo.height == 0 {
        return canvas;
    }

    // only the part of the source that lands on the canvas is scaled
    let x = visible_span(geo.offset_x, geo.width, target_w, source.width(), geo.ratio);
    let y = visible_span(geo.offset_y, geo.height, target_h, source.height(), geo.ratio);

    let src = if (x.start, y.start, x.len, y.len) == (0, 0, source.width(), source.height()) {
        source.to_rgba8()
    } else {
        source.crop_imm(x.start, y.start, x.len, y.len).to_rgba8()
    };
    let scaled = if (x.out, y.out) == src.dimensions() {
        src
    } else {
        imageops::resize(&src, x.out, y.out, FilterType::Lanczos3)
    };
    imageops::overlay(&mut canvas, &scaled, x.offset, y.offset);
    canvas
}

/// One axis of the source region to draw: source start/length, drawn length
/// and canvas offset.
struct Span {
    start: u32,
    len: u32,
    out: u32,
    offset: i64,
}

fn visible_span(offset: i64, scaled: u32, target: u32, src: u32, ratio: f64) -> Span {
    if offset >= 0 || src == 0 {
        return Span { start: 0, len: src, out: scaled, offset: offset.max(0) };
    }
    let start = ((-offset) as f64 / ratio).floor().min((src - 1) as f64) as u32;
    let len = ((target as f64 / ratio).ceil() as u32).clamp(1, src - start);
    Span { start, len, out: target, offset: 0 }
}

fn quality_percent(quality: f32) -> u8 {
    let q = if quality.is_finite() { quality.clamp(0.0, 1.0) } else { 0.92 };
    ((q * 100.0).round() as u8).max(1)
}

/// Encode the composed canvas. Failure to produce bytes is an error, never an
/// empty blob.
pub fn encode(image: &RgbaImage, kind: ImageKind, quality: f32) -> Result<Vec<u8>> {
    let (w, h) = image.dimensions();
    let mut out: Vec<u8> = Vec::new();

    let res = match kind {
        ImageKind::Png => PngEncoder::new(&mut out).write_image(image.as_raw(), w, h, ExtendedColorType::Rgba8),
        ImageKind::WebP => WebPEncoder::new_lossless(&mut out).write_image(image.as_raw(), w, h, ExtendedColorType::Rgba8),
        ImageKind::Jpeg => {
            // no alpha in JPEG
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality_percent(quality))
                .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
        }
    };

    res.map_err(|e| Error::Encode(e.to_string()))?;
    if out.is_empty() {
        return Err(Error::Encode(format!("{} encoder produced no data", kind.ext())));
    }
    Ok(out)
}

/// Inputs for [`capture_scale`]. Stage size is in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleParams {
    pub stage_width: f64,
    pub stage_height: f64,
    pub target_width: u32,
    pub target_height: u32,
    pub device_pixel_ratio: f64,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
}

/// Rasterisation scale for the stage, so the capture is never coarser than the
/// final canvas nor than the display's pixel density.
pub fn capture_scale(p: &ScaleParams) -> f64 {
    let tw = p.target_width as f64;
    let th = p.target_height as f64;
    let w = if p.stage_width > 0.0 { p.stage_width } else { tw };
    let h = if p.stage_height > 0.0 { p.stage_height } else { th };

    let dpr = if p.device_pixel_ratio.is_finite() { p.device_pixel_ratio.max(1.0) } else { 1.0 };
    let need = (tw / w).max(th / h);
    let base = dpr.max(need);
    let mut scale = p.min_scale.unwrap_or(1.0).max(base);

    if let Some(max) = p.max_scale.filter(|m| m.is_finite()) {
        scale = scale.min(max);
    }
    scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_expands() {
        assert_eq!(parse_hex_color("#fff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("0b0c11").unwrap(), Rgba([11, 12, 17, 255]));
        assert_eq!(parse_hex_color("#00000080").unwrap(), Rgba([0, 0, 0, 128]));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(parse_hex_color("#12").is_err());
        assert!(parse_hex_color("#gggggg").is_err());
        assert!(parse_hex_color("#éé").is_err());
    }

    #[test]
    fn quality_maps_to_percent() {
        assert_eq!(quality_percent(0.95), 95);
        assert_eq!(quality_percent(0.0), 1);
        assert_eq!(quality_percent(7.0), 100);
        assert_eq!(quality_percent(f32::NAN), 92);
    }
}
