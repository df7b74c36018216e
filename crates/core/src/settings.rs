//! Runtime knobs for an analysis session.

use std::{path::PathBuf, time::Duration};

use crate::{analysis::DEFAULT_REQUEST_TIMEOUT, cache::get_scratch_dir, poller::PollPolicy};

#[derive(Clone, Debug)]
pub struct AnalyzerSettings {
    /// How uploaded videos are polled until ready
    pub poll: PollPolicy,
    /// Timeout for a single generation request
    pub request_timeout: Duration,
    /// Where scratch copies of selected videos are written
    pub scratch_dir: PathBuf,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            poll: PollPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            scratch_dir: get_scratch_dir(),
        }
    }
}

impl AnalyzerSettings {
    /// Create settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll: PollPolicy {
                interval: env_secs("VIDSIGHT_POLL_INTERVAL_SECS").unwrap_or(defaults.poll.interval),
                max_attempts: std::env::var("VIDSIGHT_MAX_POLL_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .or(defaults.poll.max_attempts),
                deadline: env_secs("VIDSIGHT_POLL_DEADLINE_SECS"),
            },
            request_timeout: env_secs("VIDSIGHT_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            scratch_dir: std::env::var("VIDSIGHT_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
        }
    }
}

fn env_secs(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}
