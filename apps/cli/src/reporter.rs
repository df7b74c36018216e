use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use vidsight_core::{ProgressEvent, ProgressReporter, format_duration};

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Renders interaction progress as spinners on stderr.
pub struct SpinnerReporter {
    current: Option<ProgressBar>,
    step_start: Instant,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self {
            current: None,
            step_start: Instant::now(),
        }
    }

    fn start(&mut self, msg: &str) {
        self.clear();
        self.step_start = Instant::now();
        self.current = Some(create_spinner(msg));
    }

    fn finish(&mut self, msg: String) {
        let line = format!(
            "{} {} {}",
            style("✓").green().bold(),
            msg,
            style(format!("[{}]", format_duration(self.step_start.elapsed()))).dim()
        );
        match self.current.take() {
            Some(pb) => pb.finish_with_message(line),
            None => eprintln!("{}", line),
        }
    }

    fn clear(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn on_event(&mut self, event: &ProgressEvent) {
        match event {
            ProgressEvent::UsingCachedVideo { file_name } => {
                eprintln!(
                    "{} Using previously uploaded video: {} {}",
                    style("✓").green().bold(),
                    style(file_name).dim(),
                    style("(cached)").dim()
                );
            }
            ProgressEvent::Uploading { file_name } => {
                self.start(&format!("Uploading {}...", file_name));
            }
            ProgressEvent::Uploaded { name, uri } => {
                self.finish(format!(
                    "Video uploaded: {}",
                    style(uri.as_deref().unwrap_or(name)).cyan()
                ));
            }
            ProgressEvent::Processing { .. } => self.start("Processing video..."),
            ProgressEvent::PollAttempt { attempt, state } => {
                if let Some(pb) = &self.current {
                    pb.set_message(format!("Processing video... (check {}, {})", attempt, state));
                }
            }
            ProgressEvent::Processed { .. } => self.finish("Video processed".to_string()),
            ProgressEvent::NoVideo => {
                eprintln!(
                    "{} No video selected. Generating response from the prompt alone.",
                    style("ℹ").blue().bold()
                );
            }
            ProgressEvent::Generating { with_video } => {
                if *with_video {
                    self.start("Analyzing video...");
                } else {
                    self.start("Generating response...");
                }
            }
            ProgressEvent::Generated => self.finish("Analysis ready".to_string()),
        }
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        self.clear();
    }
}
