use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a remote file as reported by the file service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum FileState {
    #[default]
    #[serde(rename = "STATE_UNSPECIFIED")]
    Uploading,
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "ACTIVE")]
    Ready,
    #[serde(rename = "FAILED")]
    Failed,
}

impl FileState {
    /// Uploading and processing files may still change state.
    pub fn is_in_flight(self) -> bool {
        matches!(self, FileState::Uploading | FileState::Processing)
    }

    pub fn name(self) -> &'static str {
        match self {
            FileState::Uploading => "uploading",
            FileState::Processing => "processing",
            FileState::Ready => "ready",
            FileState::Failed => "failed",
        }
    }
}

impl From<String> for FileState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PROCESSING" => FileState::Processing,
            "ACTIVE" => FileState::Ready,
            "FAILED" => FileState::Failed,
            _ => FileState::Uploading,
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error attached to a file whose processing failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// A file record owned by the remote service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    /// Opaque handle, `files/<id>`.
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// int64 is carried as a JSON string
    #[serde(default)]
    pub size_bytes: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub state: FileState,
    #[serde(default)]
    pub error: Option<FileStatus>,
}

impl RemoteFile {
    pub fn size(&self) -> Option<u64> {
        self.size_bytes.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn failure_reason(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "remote processing reported FAILED".to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListFilesResponse {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub file: RemoteFile,
}

/// Reference to an uploaded file inside a generation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

/// One element of the ordered input sent to the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    FileData(FileData),
}
