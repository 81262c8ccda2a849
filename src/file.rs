// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::error::{Error, Result};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Pretty JSON, UTF-8, parent directories created.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, contents)?;
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// `-o` may name a file or a directory; a directory gets `default_filename`.
pub fn resolve_single_out_path(user_o: &Path, default_filename: &str) -> Result<PathBuf> {
    if user_o.as_os_str().is_empty() { return Ok(PathBuf::from(default_filename)); }
    if looks_like_dir_hint(user_o) || user_o.is_dir() {
        ensure_directory(user_o)?;
        Ok(user_o.join(default_filename))
    } else {
        Ok(user_o.to_path_buf())
    }
}

/// Last component of a user-supplied name, either separator style. `None`
/// when that leaves nothing usable (`""`, `.`, `..`).
pub fn bare_file_name(name: &str) -> Option<&str> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        n => Some(n),
    }
}

/// First free name in `dir`: `name.ext`, then `name (2).ext`, `name (3).ext`, ...
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let first = dir.join(file_name);
    if !first.exists() { return first; }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file_name, None),
    };

    let mut n = 2usize;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        let path = dir.join(candidate);
        if !path.exists() { return path; }
        n += 1;
    }
}
