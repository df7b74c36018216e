use crate::types::FileState;

/// Milestones of one interaction, in the order they can occur.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    UsingCachedVideo { file_name: String },
    Uploading { file_name: String },
    Uploaded { name: String, uri: Option<String> },
    Processing { name: String },
    PollAttempt { attempt: u32, state: FileState },
    Processed { name: String },
    NoVideo,
    Generating { with_video: bool },
    Generated,
}

/// Receives progress while an interaction runs.
pub trait ProgressReporter {
    fn on_event(&mut self, event: &ProgressEvent);
}

/// Discards all events.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_event(&mut self, _event: &ProgressEvent) {}
}
