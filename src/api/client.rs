use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::types::{AnalyzeRequest, AnalyzeResponse};
use crate::config::Config;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// The two analyses the dashboard asks for.
/// Implemented by `CrisisApiClient` for production; mock implementations used in tests.
///
/// `Ok(None)` means the service answered but left its result field empty.
pub trait AnalysisService {
    async fn summarize(&self, text: &str) -> Result<Option<String>, ApiError>;
    async fn predict_risk(&self, text: &str) -> Result<Option<String>, ApiError>;
}

#[derive(Clone)]
pub struct CrisisApiClient {
    http: Client,
    summarize_url: Url,
    predict_url: Url,
}

impl CrisisApiClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            summarize_url: config.summarize_url.clone(),
            predict_url: config.predict_url.clone(),
        }
    }

    /// Build the shared HTTP client with the configured timeouts.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .timeout(config.timeout)
            .build()?;
        Ok(Self::new(http, config))
    }

    async fn post_text(&self, url: &Url, text: &str) -> Result<AnalyzeResponse, ApiError> {
        let response = self
            .http
            .post(url.clone())
            .header("User-Agent", crate::USER_AGENT)
            .json(&AnalyzeRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = %status, "analysis endpoint returned error status");
            return Err(ApiError::Status(status.as_u16()));
        }

        let body: AnalyzeResponse = response.json().await?;
        if let Some(err) = &body.error {
            warn!(%url, error = %err, "analysis endpoint reported an error");
        }
        debug!(%url, "analysis endpoint responded");
        Ok(body)
    }
}

impl AnalysisService for CrisisApiClient {
    async fn summarize(&self, text: &str) -> Result<Option<String>, ApiError> {
        let body = self.post_text(&self.summarize_url, text).await?;
        Ok(body.summary.filter(|s| !s.is_empty()))
    }

    async fn predict_risk(&self, text: &str) -> Result<Option<String>, ApiError> {
        let body = self.post_text(&self.predict_url, text).await?;
        Ok(body.risk.filter(|r| !r.is_empty()))
    }
}
