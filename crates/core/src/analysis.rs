use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    cache::video_mime_type,
    error::{AnalyzerError, Result},
    remote::GenerativeModel,
    types::{FileData, Part, RemoteFile},
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Ordered model input: `[video, prompt]`, or `[prompt]` when there is no video.
pub fn build_parts(video: Option<&RemoteFile>, prompt: &str) -> Result<Vec<Part>> {
    let mut parts = Vec::with_capacity(2);

    if let Some(file) = video {
        let file_uri = file
            .uri
            .clone()
            .ok_or_else(|| AnalyzerError::MissingFileUri {
                name: file.name.clone(),
            })?;
        let mime_type = file
            .mime_type
            .clone()
            .or_else(|| {
                file.display_name
                    .as_deref()
                    .and_then(video_mime_type)
                    .map(str::to_string)
            })
            .ok_or_else(|| AnalyzerError::UnsupportedVideoFormat {
                file_name: file.display_name.clone().unwrap_or_else(|| file.name.clone()),
            })?;
        parts.push(Part::FileData(FileData {
            mime_type,
            file_uri,
        }));
    }

    parts.push(Part::Text(prompt.to_string()));
    Ok(parts)
}

/// Send the request once and return the model's text verbatim.
pub async fn invoke_analysis(
    model: &dyn GenerativeModel,
    video: Option<&RemoteFile>,
    prompt: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String> {
    let parts = build_parts(video, prompt)?;
    debug!(with_video = video.is_some(), "invoking analysis");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalyzerError::Cancelled),
        text = model.generate_content(&parts, timeout) => text,
    }
}
