//! Discovery of rendered slide images on disk.

use deck_core::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// File names picked up by default: `slide_01.png`, `slide_02.png`, ...
pub const DEFAULT_PATTERN: &str = r"^slide_.*\.png$";

/// A local image that becomes one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    /// File name; also the sort key that decides slide order.
    pub name: String,
}

impl ImageAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    /// MIME type guessed from the extension, PNG when unknown.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/png",
        }
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// List regular files in `folder` whose name matches `pattern`, sorted by
/// file name.
///
/// Ordering is plain lexicographic, so `slide_10.png` sorts before
/// `slide_2.png`; zero-padded numbering keeps slides in order.
pub fn enumerate_images(folder: &Path, pattern: &Regex) -> Result<Vec<ImageAsset>> {
    if !folder.is_dir() {
        return Err(Error::MissingInput(folder.to_path_buf()));
    }

    let mut assets = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            log::debug!("Skipping non UTF-8 file name in {}", folder.display());
            continue;
        };

        if pattern.is_match(&name) {
            assets.push(ImageAsset {
                path: entry.path(),
                name,
            });
        }
    }

    assets.sort_by(|a, b| a.name.cmp(&b.name));
    log::info!("Found {} images in {}", assets.len(), folder.display());

    Ok(assets)
}
