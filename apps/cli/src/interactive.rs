use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use vidsight_core::{Analyzer, Session, SessionState, validate_query};

use crate::commands::{analyze, delete_file, list_files, print_error};

type StdinLines = Lines<BufReader<Stdin>>;

enum Input<'a> {
    Quit,
    Help,
    Files,
    Delete(&'a str),
    ShowSession,
    Query(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((":delete", name)) => Input::Delete(name.trim()),
        _ => match trimmed {
            ":quit" | ":q" | ":exit" => Input::Quit,
            ":help" | ":h" => Input::Help,
            ":files" => Input::Files,
            ":session" => Input::ShowSession,
            ":delete" => Input::Delete(""),
            _ => Input::Query(line),
        },
    }
}

/// What the video prompt answered: keep the previous selection, clear it, or pick a new file.
fn parse_video_answer(answer: &str, previous: Option<&Path>) -> Option<PathBuf> {
    match answer.trim() {
        "" => previous.map(Path::to_path_buf),
        "-" => None,
        path => Some(PathBuf::from(path)),
    }
}

fn prompt(label: &str) -> Result<()> {
    eprint!("{} ", style(label).cyan().bold());
    std::io::stderr().flush()?;
    Ok(())
}

async fn read_line(lines: &mut StdinLines) -> Result<Option<String>> {
    tokio::select! {
        line = lines.next_line() => Ok(line?),
        _ = tokio::signal::ctrl_c() => Ok(None),
    }
}

fn print_help() {
    eprintln!("Type a query to analyze. After each query you are asked for a video:");
    eprintln!("  <path>   use that .mp4/.mov/.avi file");
    eprintln!("  <enter>  keep the previously selected video");
    eprintln!("  -        no video, prompt only");
    eprintln!("Commands: :files, :delete <name>, :session, :help, :quit");
}

fn print_session(session: &Session) {
    match (session.state(), session.cached()) {
        (SessionState::Empty, _) | (_, None) => {
            eprintln!("{} No video cached in this session.", style("ℹ").blue().bold())
        }
        (state, Some(cached)) => eprintln!(
            "{} {} -> {} ({:?}, {})",
            style("ℹ").blue().bold(),
            cached.display_name(),
            style(cached.name()).cyan(),
            state,
            cached.remote.state
        ),
    }
}

/// Session loop. The cached upload survives across turns until replaced or deleted.
pub async fn run(analyzer: &Analyzer) -> Result<()> {
    let mut session = Session::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut selected_video: Option<PathBuf> = None;

    eprintln!(
        "\n{}  {}\n",
        style("vidsight").cyan().bold(),
        style("AI Video Analyzer").dim()
    );
    print_help();

    loop {
        eprintln!();
        prompt("query ›")?;
        let Some(line) = read_line(&mut lines).await? else {
            break;
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => print_help(),
            Input::ShowSession => print_session(&session),
            Input::Files => {
                if let Err(e) = list_files(analyzer).await {
                    print_error(&e);
                }
            }
            Input::Delete(name) if name.is_empty() => print_error(&"usage: :delete <name>"),
            Input::Delete(name) => {
                if let Err(e) = delete_file(analyzer, &mut session, name).await {
                    print_error(&e);
                }
            }
            Input::Query(query) => {
                if let Err(e) = validate_query(query) {
                    print_error(&e);
                    continue;
                }
                let label = match &selected_video {
                    Some(path) => format!("video [{}, - for none] ›", path.display()),
                    None => "video [none] ›".to_string(),
                };
                prompt(&label)?;
                let Some(answer) = read_line(&mut lines).await? else {
                    break;
                };
                selected_video = parse_video_answer(&answer, selected_video.as_deref());

                if let Err(e) = analyze(analyzer, &mut session, query, selected_video.as_deref()).await {
                    print_error(&e);
                }
            }
        }
    }

    Ok(())
}
