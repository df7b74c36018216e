use std::path::Path;

use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    cache::{video_mime_type, write_scratch_video},
    error::{AnalyzerError, Result},
    progress::{ProgressEvent, ProgressReporter},
    remote::FileService,
    session::{Session, VideoFingerprint},
    types::RemoteFile,
};

/// A video picked by the user: its original file name and raw bytes.
#[derive(Clone, Debug)]
pub struct VideoInput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl VideoInput {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a video from disk, naming it after the final path component.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        if video_mime_type(&file_name).is_none() {
            return Err(AnalyzerError::UnsupportedVideoFormat { file_name });
        }
        let bytes = fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn fingerprint(&self) -> VideoFingerprint {
        VideoFingerprint::of(&self.file_name, &self.bytes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoUse {
    Reused,
    Uploaded,
}

/// Reuse the session's cached upload when `video` matches it, otherwise
/// write a scratch copy, upload it and replace the cached reference.
///
/// A failed write or upload leaves the session untouched.
pub async fn ensure_uploaded(
    files: &dyn FileService,
    session: &mut Session,
    video: &VideoInput,
    scratch_dir: &Path,
    cancel: &CancellationToken,
    reporter: &mut dyn ProgressReporter,
) -> Result<(RemoteFile, VideoUse)> {
    let mime_type = video_mime_type(&video.file_name).ok_or_else(|| {
        AnalyzerError::UnsupportedVideoFormat {
            file_name: video.file_name.clone(),
        }
    })?;
    let fingerprint = video.fingerprint();

    if let Some(cached) = session.lookup(&fingerprint) {
        info!(file = %cached.name(), "reusing cached upload");
        reporter.on_event(&ProgressEvent::UsingCachedVideo {
            file_name: video.file_name.clone(),
        });
        return Ok((cached.remote.clone(), VideoUse::Reused));
    }

    if session.is_name_collision(&fingerprint) {
        warn!(
            file_name = %video.file_name,
            "cached video has the same name but different content; uploading again"
        );
    }

    reporter.on_event(&ProgressEvent::Uploading {
        file_name: video.file_name.clone(),
    });
    let path = write_scratch_video(scratch_dir, &video.file_name, &video.bytes).await?;

    let mut remote = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AnalyzerError::Cancelled),
        uploaded = files.upload_file(&path, &video.file_name, mime_type) => uploaded?,
    };
    remote.mime_type.get_or_insert_with(|| mime_type.to_string());

    reporter.on_event(&ProgressEvent::Uploaded {
        name: remote.name.clone(),
        uri: remote.uri.clone(),
    });
    session.store(fingerprint, remote.clone());

    Ok((remote, VideoUse::Uploaded))
}
