use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vidsight_core::{Analyzer, AnalyzerSettings, GeminiClient, ProviderConfig, Session};

use crate::commands::print_error;

mod commands;
mod interactive;
mod reporter;
mod signal;

#[derive(Parser)]
#[command(name = "vidsight")]
#[command(about = "Upload videos to Gemini and get AI-generated analyses for your questions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Gemini model used for generation (overrides VIDSIGHT_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// API root, mainly for testing against a local server
    #[arg(long, global = true, hide = true)]
    base_url: Option<String>,

    /// Seconds between processing status checks
    #[arg(long, global = true)]
    poll_interval: Option<u64>,

    /// Give up after this many status checks
    #[arg(long, global = true)]
    max_poll_attempts: Option<u32>,

    /// Directory for scratch copies of selected videos
    #[arg(long, global = true)]
    scratch_dir: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a video (or just a prompt) once and print the answer
    Analyze {
        /// What you want to know about the video
        #[arg(short, long)]
        query: String,

        /// Video file to analyze (.mp4, .mov, .avi)
        #[arg(short, long)]
        video: Option<PathBuf>,
    },
    /// Manage files uploaded to the Gemini file service
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
    /// Ask several questions in one session, reusing the uploaded video
    Interactive,
}

#[derive(Subcommand)]
enum FilesAction {
    /// List uploaded files
    List,
    /// Delete an uploaded file by resource name, e.g. files/abc123
    Delete { name: String },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn build_analyzer(cli: &Cli) -> Result<Analyzer> {
    let mut config = ProviderConfig::from_env()?;
    if let Some(model) = &cli.model {
        config = config.with_model(model);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }

    let mut settings = AnalyzerSettings::from_env();
    if let Some(secs) = cli.poll_interval {
        settings.poll.interval = Duration::from_secs(secs);
    }
    if let Some(attempts) = cli.max_poll_attempts {
        settings.poll.max_attempts = Some(attempts);
    }
    if let Some(dir) = &cli.scratch_dir {
        settings.scratch_dir = dir.clone();
    }

    Ok(Analyzer::gemini(GeminiClient::new(config)?, settings))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // Validate API key early
    let analyzer = match build_analyzer(&cli) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Command::Analyze { query, video }) => {
            let mut session = Session::new();
            commands::analyze(&analyzer, &mut session, &query, video.as_deref()).await
        }
        Some(Command::Files { action }) => match action {
            FilesAction::List => commands::list_files(&analyzer).await,
            FilesAction::Delete { name } => {
                let mut session = Session::new();
                commands::delete_file(&analyzer, &mut session, &name).await
            }
        },
        Some(Command::Interactive) | None => interactive::run(&analyzer).await,
    };

    if let Err(e) = result {
        print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
