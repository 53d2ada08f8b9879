use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::utils;

/// Filename stand-in when no video identifier is held.
pub const FALLBACK_VIDEO_ID: &str = "unknown";

/// Name of the downloaded caption file for a video identifier.
pub fn captions_filename(video_id: &str) -> String {
    let id = if video_id.is_empty() {
        FALLBACK_VIDEO_ID.to_string()
    } else {
        utils::sanitize_filename(video_id)
    };

    format!("youtube-captions-{}.txt", id)
}

/// Write captions verbatim to `youtube-captions-<id>.txt` in the given
/// directory (current directory if none) and return the path.
pub fn save_captions(captions: &str, video_id: &str, dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let path = dir.join(captions_filename(video_id));
    fs_err::write(&path, captions)?;

    Ok(path)
}

/// Write captions verbatim to an explicit path.
pub fn save_to_path(captions: &str, path: &Path) -> Result<()> {
    fs_err::write(path, captions)?;
    Ok(())
}
