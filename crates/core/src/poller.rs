use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    error::{AnalyzerError, Result},
    progress::{ProgressEvent, ProgressReporter},
    remote::FileService,
    types::{FileState, RemoteFile},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 180;

/// How long to keep waiting on a remote file that is still in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Status fetches allowed before giving up. `None` means no limit.
    pub max_attempts: Option<u32>,
    /// Wall-clock budget measured from the first check. `None` means no limit.
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_POLL_ATTEMPTS),
            deadline: None,
        }
    }
}

impl PollPolicy {
    fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.deadline.is_some_and(|budget| started.elapsed() >= budget)
    }
}

/// Re-fetch `file` every `policy.interval` until it leaves the in-flight states.
///
/// Returns the refreshed record once it is ready. A `FAILED` file becomes
/// [`AnalyzerError::ProcessingFailed`]. Fetch errors are not retried.
pub async fn wait_until_ready(
    files: &dyn FileService,
    file: RemoteFile,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    reporter: &mut dyn ProgressReporter,
) -> Result<RemoteFile> {
    let started = Instant::now();
    let mut file = file;
    let mut attempts = 0;

    while file.state.is_in_flight() {
        if policy.exhausted(attempts, started) {
            warn!(file = %file.name, attempts, "gave up waiting for video processing");
            return Err(AnalyzerError::PollTimedOut {
                name: file.name,
                attempts,
            });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalyzerError::Cancelled),
            _ = sleep(policy.interval) => {}
        }

        attempts += 1;
        let name = file.name.clone();
        file = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalyzerError::Cancelled),
            refreshed = files.get_file(&name) => refreshed?,
        };

        debug!(file = %file.name, attempt = attempts, state = %file.state, "polled video status");
        reporter.on_event(&ProgressEvent::PollAttempt {
            attempt: attempts,
            state: file.state,
        });
    }

    if file.state == FileState::Failed {
        return Err(AnalyzerError::ProcessingFailed {
            reason: file.failure_reason(),
            name: file.name,
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeService, RecordingReporter};

    fn fast_policy(max_attempts: Option<u32>) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn ready_file_returns_without_fetching() {
        let service = FakeService::default();
        let file = FakeService::file("files/a", FileState::Ready);
        let mut reporter = RecordingReporter::default();

        let out = wait_until_ready(
            &service,
            file,
            &fast_policy(Some(3)),
            &CancellationToken::new(),
            &mut reporter,
        )
        .await
        .unwrap();

        assert_eq!(out.state, FileState::Ready);
        assert_eq!(service.get_calls(), 0);
        assert!(reporter.events.is_empty());
    }

    #[tokio::test]
    async fn polls_until_ready() {
        let service = FakeService::default();
        service.script_states(
            "files/a",
            &[FileState::Processing, FileState::Processing, FileState::Ready],
        );
        let mut reporter = RecordingReporter::default();

        let out = wait_until_ready(
            &service,
            FakeService::file("files/a", FileState::Processing),
            &fast_policy(Some(10)),
            &CancellationToken::new(),
            &mut reporter,
        )
        .await
        .unwrap();

        assert_eq!(out.state, FileState::Ready);
        assert_eq!(service.get_calls(), 3);
        assert_eq!(
            reporter.events.last(),
            Some(&ProgressEvent::PollAttempt {
                attempt: 3,
                state: FileState::Ready
            })
        );
    }

    #[tokio::test]
    async fn failed_state_is_an_error() {
        let service = FakeService::default();
        service.script_states("files/a", &[FileState::Failed]);

        let err = wait_until_ready(
            &service,
            FakeService::file("files/a", FileState::Processing),
            &fast_policy(Some(10)),
            &CancellationToken::new(),
            &mut RecordingReporter::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyzerError::ProcessingFailed { ref name, .. } if name == "files/a"));
    }

    #[tokio::test]
    async fn fetch_error_ends_the_wait_without_retry() {
        let service = FakeService::default();

        let err = wait_until_ready(
            &service,
            FakeService::file("files/gone", FileState::Processing),
            &fast_policy(Some(10)),
            &CancellationToken::new(),
            &mut RecordingReporter::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyzerError::Api { status: 404, .. }));
        assert_eq!(service.get_calls(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let service = FakeService::default();
        service.script_states("files/a", &[FileState::Processing; 5]);

        let err = wait_until_ready(
            &service,
            FakeService::file("files/a", FileState::Processing),
            &fast_policy(Some(2)),
            &CancellationToken::new(),
            &mut RecordingReporter::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyzerError::PollTimedOut { attempts: 2, .. }));
        assert_eq!(service.get_calls(), 2);
    }

    #[tokio::test]
    async fn deadline_bounds_the_wait() {
        let service = FakeService::default();
        service.script_states("files/a", &[FileState::Processing; 50]);
        let policy = PollPolicy {
            interval: Duration::from_millis(5),
            max_attempts: None,
            deadline: Some(Duration::from_millis(20)),
        };

        let err = wait_until_ready(
            &service,
            FakeService::file("files/a", FileState::Processing),
            &policy,
            &CancellationToken::new(),
            &mut RecordingReporter::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyzerError::PollTimedOut { .. }));
    }

    #[tokio::test]
    async fn cancellation_stops_the_wait() {
        let service = FakeService::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = wait_until_ready(
            &service,
            FakeService::file("files/a", FileState::Processing),
            &PollPolicy::default(),
            &cancel,
            &mut RecordingReporter::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalyzerError::Cancelled));
        assert_eq!(service.get_calls(), 0);
    }
}
