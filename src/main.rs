mod api;
mod cli;
mod config;
mod dashboard;
mod session;

pub const USER_AGENT: &str = concat!("crisis-dash/", env!("CARGO_PKG_VERSION"));

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::info;

use api::CrisisApiClient;
use cli::Cli;
use config::Config;
use dashboard::render::Style;
use session::OutputFormat;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crisis_dash=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let stdin_is_terminal = std::io::stdin().is_terminal();
    if let Err(e) = cli.check_stdin(stdin_is_terminal) {
        e.exit();
    }
    let config = Config::resolve(&cli.overrides())
        .inspect_err(|e| tracing::error!("invalid configuration: {e}"))?;
    let client = CrisisApiClient::from_config(&config)?;

    info!(
        summarize = %config.summarize_url,
        predict = %config.predict_url,
        "starting crisis-dash"
    );

    let format = if cli.json {
        OutputFormat::Json
    } else if cli.no_color || !std::io::stdout().is_terminal() {
        OutputFormat::Text(Style::Plain)
    } else {
        OutputFormat::Text(Style::Color)
    };
    let mut out = std::io::stdout();

    let text = match (&cli.text, &cli.file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(tokio::fs::read_to_string(path).await?),
        (None, None) if cli.interactive || stdin_is_terminal => None,
        (None, None) => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Some(buf)
        }
    };

    match text {
        Some(text) => {
            let accepted = session::run_once(&client, &text, format, &mut out).await?;
            Ok(if accepted { ExitCode::SUCCESS } else { ExitCode::from(2) })
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            session::run_interactive(&client, stdin, format, &mut out).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
