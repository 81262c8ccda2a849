// src/share/dispatch.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::config::consts::SHARE_SCRATCH_DIR;
use crate::file;

/// Encoded image plus what a share sheet needs to describe it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareMetadata {
    pub title: String,
    pub text: String,
}

/// Result of [`dispatch`]. `path` is set when the file was downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareOutcome {
    pub shared: bool,
    pub file_name: String,
    pub path: Option<PathBuf>,
}

/// A native share facility.
pub trait ShareTarget {
    /// Capability probe. Must not fail; "can't tell" is `false`.
    fn can_share(&self, file: &ShareFile) -> bool;
    fn share(&mut self, file: &ShareFile, meta: &ShareMetadata) -> Result<()>;
}

/// Where files go when nothing can share them.
pub trait Downloader {
    fn download(&mut self, bytes: &[u8], file_name: &str) -> Result<PathBuf>;
}

/// No share facility: every dispatch becomes a download.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoShare;

impl ShareTarget for NoShare {
    fn can_share(&self, _file: &ShareFile) -> bool { false }
    fn share(&mut self, _file: &ShareFile, _meta: &ShareMetadata) -> Result<()> {
        Err(Error::Share(s!("sharing is not available")))
    }
}

/// Hands the file to an external program (`termux-share`, `xdg-open`, ...).
///
/// The file is written to `dir` first; its path is the last argument. The
/// program may still be reading it after it exits, so the previous share's
/// file is cleared at the start of the next one instead.
#[derive(Clone, Debug)]
pub struct CommandShare {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

impl CommandShare {
    /// Split a command line on whitespace: program first, then fixed args.
    pub fn parse(cmdline: &str) -> Option<Self> {
        let mut parts = cmdline.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            dir: std::env::temp_dir().join(SHARE_SCRATCH_DIR),
        })
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

fn clear_dir(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        if let Err(e) = fs::remove_file(entry.path()) {
            warn!(path = %entry.path().display(), error = %e, "could not remove old share file");
        }
    }
}

impl ShareTarget for CommandShare {
    fn can_share(&self, file: &ShareFile) -> bool {
        !self.program.is_empty() && !file.bytes.is_empty()
    }

    fn share(&mut self, file: &ShareFile, meta: &ShareMetadata) -> Result<()> {
        let name = file::bare_file_name(&file.name).ok_or_else(|| Error::InvalidFileName(s!(&file.name)))?;
        clear_dir(&self.dir);
        file::ensure_directory(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, &file.bytes)?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .env("SHARE_TITLE", &meta.title)
            .env("SHARE_TEXT", &meta.text)
            .env("SHARE_MIME", &file.mime)
            .status()?;

        if !status.success() {
            return Err(Error::Share(format!("{} exited with {status}", self.program)));
        }
        Ok(())
    }
}

/// Writes into a directory; clashing names get a ` (N)` suffix. Directory parts
/// of the name are dropped.
#[derive(Clone, Debug)]
pub struct DirDownloader {
    pub dir: PathBuf,
}

impl DirDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Downloader for DirDownloader {
    fn download(&mut self, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        let name = file::bare_file_name(file_name).ok_or_else(|| Error::InvalidFileName(s!(file_name)))?;
        file::ensure_directory(&self.dir)?;
        let path = file::unique_path(&self.dir, name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Share natively when the target says it can, otherwise download.
///
/// The download branch is the normal path on desktop, not an error. A failing
/// native share propagates; it is not retried as a download.
pub fn dispatch(
    file: &ShareFile,
    meta: &ShareMetadata,
    target: &mut dyn ShareTarget,
    downloader: &mut dyn Downloader,
) -> Result<ShareOutcome> {
    if target.can_share(file) {
        debug!(name = %file.name, "native share");
        target.share(file, meta)?;
        info!(name = %file.name, "shared");
        return Ok(ShareOutcome { shared: true, file_name: file.name.clone(), path: None });
    }

    let path = downloader.download(&file.bytes, &file.name)?;
    info!(path = %path.display(), "downloaded");
    Ok(ShareOutcome { shared: false, file_name: file.name.clone(), path: Some(path) })
}
