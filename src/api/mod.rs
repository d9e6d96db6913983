//! HTTP client for the summarisation and risk-prediction services.

pub mod client;
pub mod types;

pub use client::{AnalysisService, ApiError, CrisisApiClient};
