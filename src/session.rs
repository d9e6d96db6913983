//! Operator-facing loops: a single analysis, or an interactive session.

use std::io::Write;

use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::AnalysisService;
use crate::dashboard::render::{Style, render};
use crate::dashboard::Dashboard;

const BUSY_NOTICE: &str = "Analysis in progress; input ignored until it completes.";
const NOTHING_TO_REFRESH: &str = "Nothing to refresh: enter a crisis update first.";
const HELP: &str = "Type a crisis update and press Enter to analyze it.\n\
Commands: :refresh (re-run the last update), :help, :quit";
const PROMPT: &str = "crisis> ";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text(Style),
    Json,
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Update(&'a str),
    Refresh,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    match line.trim() {
        ":refresh" | ":r" => Command::Refresh,
        ":help" | ":h" | ":?" => Command::Help,
        ":quit" | ":q" | ":exit" => Command::Quit,
        _ => Command::Update(line),
    }
}

fn frame(dashboard: &Dashboard, format: OutputFormat) -> Result<String, SessionError> {
    Ok(match format {
        OutputFormat::Text(style) => render(dashboard, style),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&dashboard.snapshot())?),
    })
}

fn show(dashboard: &Dashboard, format: OutputFormat, out: &mut impl Write) -> Result<(), SessionError> {
    write!(out, "{}", frame(dashboard, format)?)?;
    out.flush()?;
    Ok(())
}

/// Operator chatter (help, prompt, notices). Kept off stdout in JSON mode so
/// the output stays a plain stream of JSON documents.
fn notice(format: OutputFormat, out: &mut impl Write, message: &str) -> Result<(), SessionError> {
    match format {
        OutputFormat::Text(_) => writeln!(out, "{message}")?,
        OutputFormat::Json => info!("{message}"),
    }
    Ok(())
}

/// Analyze `text` once and print the result. Returns `false` when the text was
/// blank and nothing was sent.
pub async fn run_once(
    service: &impl AnalysisService,
    text: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<bool, SessionError> {
    let mut dashboard = Dashboard::new();
    dashboard.set_input(text);
    let accepted = dashboard.analyze(service).await.is_ok();
    show(&dashboard, format, out)?;
    Ok(accepted)
}

/// Read updates line by line until `:quit` or end of input.
///
/// The dashboard is printed when an analysis starts, each time one panel
/// settles while the other is still loading, and once both are done.
/// Lines arriving while an analysis is in flight are rejected with a notice;
/// a `:quit` among them ends the session once the analysis settles. Meant for
/// a terminal: piped input arrives all at once and would mostly be rejected.
pub async fn run_interactive<R>(
    service: &impl AnalysisService,
    input: R,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), SessionError>
where
    R: AsyncBufRead + Unpin,
{
    let mut dashboard = Dashboard::new();
    let mut lines = input.lines();
    let mut input_closed = false;
    let mut quit_requested = false;

    notice(format, out, HELP)?;
    info!("interactive session started");

    while !input_closed && !quit_requested {
        if let OutputFormat::Text(_) = format {
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let refresh = match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                notice(format, out, HELP)?;
                continue;
            }
            Command::Refresh if !dashboard.can_submit() => {
                notice(format, out, NOTHING_TO_REFRESH)?;
                continue;
            }
            Command::Refresh => true,
            Command::Update(text) => {
                dashboard.set_input(text);
                false
            }
        };

        let (frames_tx, mut frames) = mpsc::unbounded_channel();
        {
            let on_progress = move |d: &Dashboard| {
                // Receiver outlives the analysis.
                let _ = frames_tx.send(frame(d, format));
            };
            let analysis = async {
                if refresh {
                    debug!("refresh requested");
                    dashboard.refresh(service, on_progress).await;
                } else {
                    // A blank update leaves its message on the dashboard.
                    let _ = dashboard.analyze_with(service, on_progress).await;
                }
            };
            tokio::pin!(analysis);
            loop {
                tokio::select! {
                    biased;
                    Some(rendered) = frames.recv() => {
                        write!(out, "{}", rendered?)?;
                        out.flush()?;
                    }
                    _ = &mut analysis => break,
                    line = lines.next_line(), if !input_closed && !quit_requested => match line? {
                        Some(line) if parse_command(&line) == Command::Quit => {
                            quit_requested = true;
                        }
                        Some(_) => notice(format, out, BUSY_NOTICE)?,
                        None => input_closed = true,
                    },
                }
            }
        }
        while let Ok(rendered) = frames.try_recv() {
            write!(out, "{}", rendered?)?;
        }

        show(&dashboard, format, out)?;
    }

    info!("interactive session ended");
    Ok(())
}
