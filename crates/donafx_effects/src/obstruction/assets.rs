//! Obstruction asset selection.
//!
//! An unreadable, empty or unconfigured asset directory is not an error:
//! the caller falls back to the built-in solid colour overlay.

use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions accepted as random obstruction assets.
pub const OBSTRUCTION_EXTENSIONS: [&str; 9] =
    ["png", "jpg", "jpeg", "bmp", "gif", "mp4", "webm", "mov", "avi"];

/// Extensions that make an obstruction a looping video (animated GIFs included).
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "gif", "mov", "avi"];

/// Extensions picked from a media folder for an image overlay action.
pub const OVERLAY_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Extensions picked from a media folder for a video overlay action.
pub const OVERLAY_VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "gif", "mov"];

/// What an obstruction overlay will show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetChoice {
    /// Synthetic solid-colour rectangle
    BuiltinColor,
    /// Media file on disk
    File(PathBuf),
}

/// Lowercased extension of `path`, without the dot.
#[must_use]
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Is `path` played back as a looping video?
#[must_use]
pub fn is_video(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// Regular files in `dir` whose extension is in `extensions`
/// (case-insensitive), sorted by path.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be read.
pub fn list_media(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if extension_of(&path).is_some_and(|ext| extensions.contains(&ext.as_str())) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Picks one file uniformly from `dir`. `None` if the directory is
/// unreadable or holds no matching file; read failures are logged.
pub fn pick_from_dir(dir: &Path, extensions: &[&str], rng: &mut impl Rng) -> Option<PathBuf> {
    match list_media(dir, extensions) {
        Ok(files) if files.is_empty() => None,
        Ok(mut files) => {
            let index = rng.gen_range(0..files.len());
            Some(files.swap_remove(index))
        }
        Err(e) => {
            tracing::warn!("assets: failed to read '{}': {}", dir.display(), e);
            None
        }
    }
}

/// Picks a random obstruction asset, or the built-in colour overlay.
pub fn select_obstruction_asset(dir: Option<&Path>, rng: &mut impl Rng) -> AssetChoice {
    dir.and_then(|d| pick_from_dir(d, &OBSTRUCTION_EXTENSIONS, rng))
        .map_or(AssetChoice::BuiltinColor, AssetChoice::File)
}
