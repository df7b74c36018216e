use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Please enter a query before proceeding.")]
    EmptyQuery,

    #[error("Unsupported video format for {file_name}: expected one of mp4, mov, avi")]
    UnsupportedVideoFormat { file_name: String },

    #[error("Could not write scratch copy to {path}: {source}")]
    ScratchWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing API key: set one of {env_vars}")]
    MissingApiKey { env_vars: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Upload session was not opened: response had no x-goog-upload-url header")]
    MissingUploadUrl,

    #[error("Video processing failed for {name}: {reason}")]
    ProcessingFailed { name: String, reason: String },

    #[error("Remote file {name} has no URI to reference")]
    MissingFileUri { name: String },

    #[error("Video {name} was still processing after {attempts} status checks")]
    PollTimedOut { name: String, attempts: u32 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Model returned no text: {reason}")]
    EmptyResponse { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
