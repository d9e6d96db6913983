use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Body returned by both endpoints. Each endpoint fills only its own field.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeResponse {
    pub summary: Option<String>,
    pub risk: Option<String>,
    pub error: Option<String>,
}
