use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::{
    analysis::invoke_analysis,
    client::GeminiClient,
    error::Result,
    poller::wait_until_ready,
    progress::{ProgressEvent, ProgressReporter},
    prompt::{compose_prompt, validate_query},
    registry::{delete_uploaded, list_uploaded},
    remote::{FileService, GenerativeModel},
    session::Session,
    settings::AnalyzerSettings,
    types::RemoteFile,
    upload::{VideoInput, VideoUse, ensure_uploaded},
};

/// What the user submitted for one interaction.
#[derive(Clone, Debug)]
pub struct AnalysisInput {
    pub query: String,
    pub video: Option<VideoInput>,
}

impl AnalysisInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            video: None,
        }
    }

    pub fn with_video(mut self, video: VideoInput) -> Self {
        self.video = Some(video);
        self
    }
}

#[derive(Clone, Debug)]
pub struct AnalysisOutcome {
    /// Model output, unmodified
    pub text: String,
    /// How the video was obtained, if one was selected
    pub video: Option<VideoUse>,
    /// Remote file referenced by the request
    pub remote: Option<RemoteFile>,
}

/// Runs interactions against a file service and a model.
#[derive(Clone)]
pub struct Analyzer {
    files: Arc<dyn FileService>,
    model: Arc<dyn GenerativeModel>,
    settings: AnalyzerSettings,
}

impl Analyzer {
    pub fn new(
        files: Arc<dyn FileService>,
        model: Arc<dyn GenerativeModel>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            files,
            model,
            settings,
        }
    }

    /// One Gemini client serves both files and generation.
    pub fn gemini(client: GeminiClient, settings: AnalyzerSettings) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, settings)
    }

    pub async fn list_files(&self) -> Result<Vec<RemoteFile>> {
        list_uploaded(self.files.as_ref()).await
    }

    pub async fn delete_file(&self, session: &mut Session, name: &str) -> Result<RemoteFile> {
        delete_uploaded(self.files.as_ref(), session, name).await
    }

    /// Validate, upload or reuse the video, wait for processing, then generate.
    ///
    /// Nothing remote is contacted for an empty query. A video that fails or
    /// times out during processing is dropped from the session so the next
    /// interaction uploads it again.
    pub async fn run(
        &self,
        session: &mut Session,
        input: &AnalysisInput,
        cancel: &CancellationToken,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<AnalysisOutcome> {
        let span = info_span!("interaction", id = %Uuid::new_v4());
        self.run_inner(session, input, cancel, reporter)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        session: &mut Session,
        input: &AnalysisInput,
        cancel: &CancellationToken,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<AnalysisOutcome> {
        validate_query(&input.query)?;
        let prompt = compose_prompt(&input.query);

        let (remote, usage) = match &input.video {
            Some(video) => {
                let (remote, usage) = ensure_uploaded(
                    self.files.as_ref(),
                    session,
                    video,
                    &self.settings.scratch_dir,
                    cancel,
                    reporter,
                )
                .await?;

                let remote = match usage {
                    VideoUse::Reused => remote,
                    VideoUse::Uploaded => self.await_processing(session, remote, cancel, reporter).await?,
                };
                (Some(remote), Some(usage))
            }
            None => {
                reporter.on_event(&ProgressEvent::NoVideo);
                (None, None)
            }
        };

        reporter.on_event(&ProgressEvent::Generating {
            with_video: remote.is_some(),
        });
        let text = invoke_analysis(
            self.model.as_ref(),
            remote.as_ref(),
            &prompt,
            self.settings.request_timeout,
            cancel,
        )
        .await?;
        reporter.on_event(&ProgressEvent::Generated);
        info!(bytes = text.len(), with_video = remote.is_some(), "analysis complete");

        Ok(AnalysisOutcome {
            text,
            video: usage,
            remote,
        })
    }

    async fn await_processing(
        &self,
        session: &mut Session,
        remote: RemoteFile,
        cancel: &CancellationToken,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<RemoteFile> {
        let name = remote.name.clone();
        let mime_type = remote.mime_type.clone();
        reporter.on_event(&ProgressEvent::Processing { name: name.clone() });

        match wait_until_ready(self.files.as_ref(), remote, &self.settings.poll, cancel, reporter).await {
            Ok(mut ready) => {
                if ready.mime_type.is_none() {
                    ready.mime_type = mime_type;
                }
                session.update_remote(ready.clone());
                reporter.on_event(&ProgressEvent::Processed { name });
                Ok(ready)
            }
            Err(err) => {
                session.forget_remote(&name);
                Err(err)
            }
        }
    }
}
