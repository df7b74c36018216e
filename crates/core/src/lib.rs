//! Vidsight Core Library
//!
//! Uploads videos to the Gemini file service, waits for them to be processed
//! and asks a multimodal model to analyze them against a user query.

pub mod analysis;
pub mod cache;
pub mod client;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod poller;
pub mod progress;
pub mod prompt;
pub mod provider;
pub mod registry;
pub mod remote;
pub mod session;
pub mod settings;
pub mod types;
pub mod upload;

#[cfg(test)]
mod testing;

pub use cache::{get_root_cache_dir, get_scratch_dir, video_mime_type};
pub use client::GeminiClient;
pub use error::{AnalyzerError, Result};
pub use format::{format_bytes, format_duration, format_file_row};
pub use pipeline::{AnalysisInput, AnalysisOutcome, Analyzer};
pub use poller::PollPolicy;
pub use progress::{ProgressEvent, ProgressReporter, SilentReporter};
pub use prompt::{compose_prompt, validate_query};
pub use provider::{ProviderConfig, validate_api_key};
pub use remote::{FileService, GenerativeModel};
pub use session::{CachedVideo, Session, SessionState, VideoFingerprint};
pub use settings::AnalyzerSettings;
pub use types::{FileState, Part, RemoteFile};
pub use upload::{VideoInput, VideoUse};
pub use tokio_util::sync::CancellationToken;
