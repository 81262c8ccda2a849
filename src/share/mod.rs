// src/share/mod.rs
//! # Share image export
//!
//! Turns a captured "stage" into a fixed-size image (1080×1920 by default) and
//! hands it to a native share facility, or downloads it when there is none.
//!
//! ## Pipeline
//! ```text
//! Stage::capture(scale) → compose::compose → compose::encode → dispatch::dispatch
//!        ↑ capture_scale                                  ↘ ShareTarget | Downloader
//! ```
//!
//! ## Invariants
//! - The capture scale is never below the device pixel ratio, nor below what the
//!   target size needs, so the final canvas is never upsampled from a coarse grab.
//! - Decorations hidden for the capture and the temporary capture class are
//!   restored by drop guards, whichever step fails.
//! - "Cannot share natively" is the common case and resolves to a download.
//!   A native share that fails is reported, not silently downloaded.
//!
//! [`social`] holds the Instagram / WhatsApp openers used next to the share button.
pub mod compose;
pub mod dispatch;
pub mod social;
pub mod stage;

pub use compose::{FitGeometry, FitMode, ImageKind};
pub use dispatch::{DirDownloader, Downloader, NoShare, ShareOutcome, ShareTarget, dispatch};
pub use stage::{Decoration, ImageStage, Stage, StageShareHandler};
