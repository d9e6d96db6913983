//! Dashboard state and the dual-request analysis that fills it.

pub mod render;
pub mod risk;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{AnalysisService, ApiError};
pub use risk::RiskBucket;

pub const EMPTY_REPORT_MESSAGE: &str = "Please enter a crisis update before analyzing.";
pub const SUMMARY_FAILED: &str = "Error: Unable to generate summary. Please check API connection.";
pub const RISK_FAILED: &str = "Error: Unable to predict risk level. Please check API connection.";
pub const NO_SUMMARY: &str = "No summary available";
pub const NO_RISK: &str = "Risk level unavailable";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", EMPTY_REPORT_MESSAGE)]
    EmptyReport,
}

/// Operator-entered free text describing an event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrisisReport(String);

impl CrisisReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Empty,
    Loading,
    Ready(String),
    /// The request failed; holds the placeholder shown instead of a result.
    Failed(String),
}

/// Display slot for one endpoint's result.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    state: PanelState,
}

impl Panel {
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PanelState::Loading)
    }

    /// Text shown in the panel body, success or placeholder.
    pub fn text(&self) -> Option<&str> {
        match &self.state {
            PanelState::Ready(t) | PanelState::Failed(t) => Some(t),
            PanelState::Empty | PanelState::Loading => None,
        }
    }
}

/// Await one endpoint call and turn its outcome into the panel's final state.
async fn settle(
    label: &str,
    call: impl Future<Output = Result<Option<String>, ApiError>>,
    missing: &str,
    failed: &str,
) -> PanelState {
    match call.await {
        Ok(Some(text)) => PanelState::Ready(text),
        Ok(None) => PanelState::Ready(missing.to_string()),
        Err(e) => {
            warn!(error = %e, "{label} request failed");
            PanelState::Failed(failed.to_string())
        }
    }
}

#[derive(Debug, Default)]
pub struct Dashboard {
    input: CrisisReport,
    summary: Panel,
    risk: Panel,
    loading: bool,
    error: Option<String>,
    last_updated: Option<DateTime<Local>>,
}

/// Serializable view of a [`Dashboard`].
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub input: &'a str,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub summary: &'a PanelState,
    pub risk: &'a PanelState,
    pub risk_bucket: Option<RiskBucket>,
    pub last_updated: Option<DateTime<Local>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = CrisisReport::new(text);
    }

    pub fn input(&self) -> &CrisisReport {
        &self.input
    }

    pub fn summary(&self) -> &Panel {
        &self.summary
    }

    pub fn risk(&self) -> &Panel {
        &self.risk
    }

    pub fn risk_bucket(&self) -> Option<RiskBucket> {
        self.risk.text().map(RiskBucket::classify)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// Whether a new analysis may be triggered right now.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.is_blank()
    }

    /// Run both analyses on the current input and wait for both to settle.
    ///
    /// Request failures never escape: each panel ends up holding either the
    /// service's answer or a placeholder. Only blank input is an error, in
    /// which case no request is sent.
    pub async fn analyze(&mut self, service: &impl AnalysisService) -> Result<(), ValidationError> {
        self.analyze_with(service, |_| {}).await
    }

    /// Like [`Dashboard::analyze`], calling `on_progress` once both panels are
    /// loading and again each time one panel settles while the other is still
    /// loading. The final state is not reported; read it after the call returns.
    pub async fn analyze_with(
        &mut self,
        service: &impl AnalysisService,
        mut on_progress: impl FnMut(&Dashboard),
    ) -> Result<(), ValidationError> {
        if self.input.is_blank() {
            self.error = Some(EMPTY_REPORT_MESSAGE.to_string());
            return Err(ValidationError::EmptyReport);
        }

        self.error = None;
        self.loading = true;
        self.summary.state = PanelState::Loading;
        self.risk.state = PanelState::Loading;
        info!(bytes = self.input.text().len(), "analyzing crisis update");
        on_progress(self);

        let text = self.input.text().to_string();
        let summary = settle(
            "summarisation",
            service.summarize(&text),
            NO_SUMMARY,
            SUMMARY_FAILED,
        );
        let risk = settle(
            "risk prediction",
            service.predict_risk(&text),
            NO_RISK,
            RISK_FAILED,
        );
        tokio::pin!(summary, risk);

        // Fan-in: each panel is written as soon as its own call settles.
        while self.summary.is_loading() || self.risk.is_loading() {
            tokio::select! {
                state = &mut summary, if self.summary.is_loading() => self.summary.state = state,
                state = &mut risk, if self.risk.is_loading() => self.risk.state = state,
            }
            if self.summary.is_loading() || self.risk.is_loading() {
                on_progress(self);
            }
        }

        self.loading = false;
        self.last_updated = Some(Local::now());
        info!(
            summary_ok = matches!(self.summary.state, PanelState::Ready(_)),
            risk_ok = matches!(self.risk.state, PanelState::Ready(_)),
            "analysis complete"
        );
        Ok(())
    }

    /// Re-run the analysis if there is input to analyze, reporting progress as
    /// [`Dashboard::analyze_with`] does. Blank input is ignored silently.
    /// Returns whether an analysis ran.
    pub async fn refresh(
        &mut self,
        service: &impl AnalysisService,
        on_progress: impl FnMut(&Dashboard),
    ) -> bool {
        if self.input.is_blank() {
            return false;
        }
        self.analyze_with(service, on_progress).await.is_ok()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            input: self.input.text(),
            loading: self.loading,
            error: self.error.as_deref(),
            summary: &self.summary.state,
            risk: &self.risk.state,
            risk_bucket: self.risk_bucket(),
            last_updated: self.last_updated,
        }
    }
}
