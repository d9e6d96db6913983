use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::config::Overrides;

/// Summarise crisis updates and predict their risk level.
#[derive(Debug, Parser)]
#[command(name = "crisis-dash", version, about)]
pub struct Cli {
    /// Crisis update to analyze (e.g. "Heavy rains in Assam have caused floods displacing thousands.")
    pub text: Option<String>,

    /// Read the crisis update from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Read updates line by line from a terminal and analyze each one (":refresh", ":quit")
    #[arg(short, long, conflicts_with_all = ["text", "file"])]
    pub interactive: bool,

    /// Print the dashboard state as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Base URL serving /summarise and /predict [env: CRISIS_DASH_API_BASE]
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Full summarisation endpoint URL [env: CRISIS_DASH_SUMMARIZE_URL]
    #[arg(long, value_name = "URL")]
    pub summarize_url: Option<String>,

    /// Full risk prediction endpoint URL [env: CRISIS_DASH_PREDICT_URL]
    #[arg(long, value_name = "URL")]
    pub predict_url: Option<String>,

    /// Per-request timeout in seconds [env: CRISIS_DASH_TIMEOUT_SECS] [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_base: self.api_base.clone(),
            summarize_url: self.summarize_url.clone(),
            predict_url: self.predict_url.clone(),
            timeout_secs: self.timeout,
        }
    }

    /// Reject `--interactive` on piped stdin: lines that arrive while an
    /// analysis runs are refused, so a piped batch would only run its first update.
    pub fn check_stdin(&self, stdin_is_terminal: bool) -> Result<(), clap::Error> {
        if self.interactive && !stdin_is_terminal {
            return Err(Cli::command().error(
                ErrorKind::ArgumentConflict,
                "--interactive needs a terminal on stdin; pipe a single update without it instead",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_text_and_flags() {
        let cli = Cli::try_parse_from([
            "crisis-dash",
            "Floods in Assam",
            "--json",
            "--api-base",
            "http://localhost:8000",
            "--timeout",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.text.as_deref(), Some("Floods in Assam"));
        assert!(cli.json);
        let overrides = cli.overrides();
        assert_eq!(overrides.api_base.as_deref(), Some("http://localhost:8000"));
        assert_eq!(overrides.timeout_secs, Some(5));
    }

    #[test]
    fn interactive_conflicts_with_text() {
        let err = Cli::try_parse_from(["crisis-dash", "--interactive", "text"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn interactive_requires_terminal_stdin() {
        let cli = Cli::try_parse_from(["crisis-dash", "--interactive"]).unwrap();
        let err = cli.check_stdin(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(cli.check_stdin(true).is_ok());
    }

    #[test]
    fn piped_stdin_is_fine_without_interactive() {
        let cli = Cli::try_parse_from(["crisis-dash"]).unwrap();
        assert!(cli.check_stdin(false).is_ok());
    }

    #[test]
    fn file_conflicts_with_text() {
        assert!(Cli::try_parse_from(["crisis-dash", "--file", "a.txt", "text"]).is_err());
    }
}
