use crossterm::style::{StyledContent, Stylize};

use super::{Dashboard, Panel, PanelState, RiskBucket};

const TITLE: &str = "AI Crisis Response Dashboard";
const TAGLINE: &str = "Summarises crisis reports and predicts risk levels for rapid decision support";
const SUMMARY_TITLE: &str = "AI Summary";
const RISK_TITLE: &str = "Risk Level Prediction";
const SUMMARY_PROMPT: &str = "Enter a crisis update and run an analysis to generate an AI summary";
const RISK_PROMPT: &str = "Enter a crisis update and run an analysis to predict risk level";
const SUMMARY_LOADING: &str = "Generating summary...";
const RISK_LOADING: &str = "Predicting risk level...";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Color,
}

impl Style {
    fn paint<'a>(self, text: &'a str, f: impl FnOnce(&'a str) -> StyledContent<&'a str>) -> String {
        match self {
            Style::Plain => text.to_string(),
            Style::Color => f(text).to_string(),
        }
    }

    fn bucket(self, bucket: RiskBucket, text: &str) -> String {
        self.paint(text, |t| match bucket {
            RiskBucket::High | RiskBucket::Failure => t.red(),
            RiskBucket::Medium => t.yellow(),
            RiskBucket::Low => t.green(),
            RiskBucket::Unknown => t.dark_grey(),
        })
    }
}

pub fn render(dashboard: &Dashboard, style: Style) -> String {
    let mut output = String::new();

    output.push_str(&style.paint(TITLE, |t| t.bold()));
    output.push('\n');
    output.push_str(TAGLINE);
    output.push_str("\n\n");

    output.push_str("Crisis update:\n");
    if dashboard.input().is_blank() {
        output.push_str("  (none)\n");
    } else {
        push_indented(&mut output, dashboard.input().text());
    }
    if let Some(error) = dashboard.error() {
        output.push_str(&style.paint(&format!("✖ {error}"), |t| t.red()));
        output.push('\n');
    }
    if dashboard.is_loading() {
        output.push_str("Analyzing...\n");
    }
    output.push('\n');

    push_heading(&mut output, SUMMARY_TITLE, style);
    push_panel(&mut output, dashboard.summary(), SUMMARY_LOADING, SUMMARY_PROMPT, style, |body, text| {
        push_indented(body, text)
    });
    output.push('\n');

    push_heading(&mut output, RISK_TITLE, style);
    push_panel(&mut output, dashboard.risk(), RISK_LOADING, RISK_PROMPT, style, |body, text| {
        let bucket = RiskBucket::classify(text);
        let label = format!("{} Risk Assessment: {}", bucket.icon(), bucket.label());
        body.push_str("  ");
        body.push_str(&style.bucket(bucket, &label));
        body.push('\n');
        push_indented(body, &style.bucket(bucket, text));
    });

    if let Some(stamp) = dashboard.last_updated() {
        output.push('\n');
        let line = format!("✔ Last updated: {}", stamp.format(TIMESTAMP_FORMAT));
        output.push_str(&style.paint(&line, |t| t.green()));
        output.push('\n');
    }

    output
}

fn push_heading(output: &mut String, title: &str, style: Style) {
    let heading = format!("── {title} ──");
    output.push_str(&style.paint(&heading, |t| t.bold()));
    output.push('\n');
}

fn push_panel(
    output: &mut String,
    panel: &Panel,
    loading: &str,
    prompt: &str,
    style: Style,
    body: impl FnOnce(&mut String, &str),
) {
    match panel.state() {
        PanelState::Empty => push_indented(output, &style.paint(prompt, |t| t.dark_grey())),
        PanelState::Loading => push_indented(output, loading),
        PanelState::Ready(text) | PanelState::Failed(text) => body(output, text),
    }
}

fn push_indented(output: &mut String, text: &str) {
    for line in text.lines() {
        output.push_str("  ");
        output.push_str(line);
        output.push('\n');
    }
}
