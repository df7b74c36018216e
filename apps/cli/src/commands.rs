use std::path::Path;

use anyhow::Result;
use console::style;
use vidsight_core::{AnalysisInput, Analyzer, Session, VideoInput, format_file_row};

use crate::{reporter::SpinnerReporter, signal::cancel_on_ctrl_c};

pub fn print_error(err: &dyn std::fmt::Display) {
    eprintln!("{} {}", style("Error:").red().bold(), err);
}

/// Run one interaction and print the model's text to stdout.
pub async fn analyze(
    analyzer: &Analyzer,
    session: &mut Session,
    query: &str,
    video: Option<&Path>,
) -> Result<()> {
    let mut input = AnalysisInput::new(query);
    if let Some(path) = video {
        input = input.with_video(VideoInput::from_path(path).await?);
    }

    let cancel = cancel_on_ctrl_c();
    let mut reporter = SpinnerReporter::new();
    let outcome = analyzer.run(session, &input, &cancel, &mut reporter).await;
    drop(reporter);
    cancel.cancel();

    let outcome = outcome?;
    eprintln!("{}", style("─".repeat(60)).dim());
    println!("{}", outcome.text);
    Ok(())
}

pub async fn list_files(analyzer: &Analyzer) -> Result<()> {
    let files = match analyzer.list_files().await {
        Ok(files) => files,
        Err(e) => {
            return Err(anyhow::anyhow!("Could not fetch uploaded files. {}", e));
        }
    };

    if files.is_empty() {
        println!("{} No uploaded files available.", style("ℹ").blue().bold());
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "{:<24} {:<28} {:<10} {:>10}  {}",
            "NAME", "DISPLAY NAME", "STATE", "SIZE", "EXPIRES"
        ))
        .dim()
    );
    for file in &files {
        println!("{}", format_file_row(file));
    }
    Ok(())
}

pub async fn delete_file(analyzer: &Analyzer, session: &mut Session, name: &str) -> Result<()> {
    let deleted = analyzer.delete_file(session, name).await?;
    println!(
        "{} Deleted file: {}",
        style("✓").green().bold(),
        style(&deleted.name).cyan()
    );
    Ok(())
}
