use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{AnalyzerError, Result};

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("vidsight")
}

/// Default directory for scratch copies of selected videos
pub fn get_scratch_dir() -> PathBuf {
    get_root_cache_dir().join("temp_videos")
}

/// MIME type for the accepted video containers
pub fn video_mime_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?;
    match ext.to_string_lossy().to_lowercase().as_str() {
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}

/// Scratch path for a video, keeping only the final component of its name
pub fn get_scratch_path(scratch_dir: &Path, file_name: &str) -> PathBuf {
    let base = Path::new(file_name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "video".into());
    scratch_dir.join(base)
}

/// Write the raw video bytes to scratch storage. Existing files are overwritten.
pub async fn write_scratch_video(scratch_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = get_scratch_path(scratch_dir, file_name);
    let scratch_err = |source| AnalyzerError::ScratchWriteFailed {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(scratch_dir).await.map_err(scratch_err)?;
    fs::write(&path, bytes).await.map_err(scratch_err)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote scratch video");

    Ok(path)
}
