use serde::Serialize;

/// Display severity derived from the risk service's free-text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBucket {
    High,
    Medium,
    Low,
    Unknown,
    Failure,
}

/// Checked top to bottom; the first row with a matching keyword wins.
const RULES: &[(&[&str], RiskBucket)] = &[
    (&["error"], RiskBucket::Failure),
    (&["high", "severe", "critical"], RiskBucket::High),
    (&["medium", "moderate"], RiskBucket::Medium),
    (&["low", "minimal"], RiskBucket::Low),
];

impl RiskBucket {
    pub fn classify(risk: &str) -> Self {
        let lower = risk.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|&(_, bucket)| bucket)
            .unwrap_or(RiskBucket::Unknown)
    }

    pub fn icon(self) -> &'static str {
        match self {
            RiskBucket::High => "▲",
            RiskBucket::Medium => "●",
            RiskBucket::Low => "✔",
            RiskBucket::Failure => "✖",
            RiskBucket::Unknown => "?",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskBucket::High => "high",
            RiskBucket::Medium => "medium",
            RiskBucket::Low => "low",
            RiskBucket::Failure => "failure",
            RiskBucket::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_is_high_regardless_of_case() {
        assert_eq!(RiskBucket::classify("CRITICAL"), RiskBucket::High);
        assert_eq!(RiskBucket::classify("Critical risk"), RiskBucket::High);
        assert_eq!(RiskBucket::classify("risk is critical"), RiskBucket::High);
    }

    #[test]
    fn high_keywords() {
        assert_eq!(RiskBucket::classify("High"), RiskBucket::High);
        assert_eq!(RiskBucket::classify("Severe flooding expected"), RiskBucket::High);
    }

    #[test]
    fn medium_keywords() {
        assert_eq!(RiskBucket::classify("Medium"), RiskBucket::Medium);
        assert_eq!(RiskBucket::classify("moderate"), RiskBucket::Medium);
    }

    #[test]
    fn low_keywords() {
        assert_eq!(RiskBucket::classify("low"), RiskBucket::Low);
        assert_eq!(RiskBucket::classify("Minimal impact"), RiskBucket::Low);
    }

    #[test]
    fn error_wins_over_low() {
        assert_eq!(
            RiskBucket::classify("Error: confidence too low"),
            RiskBucket::Failure
        );
        assert_eq!(
            RiskBucket::classify("Error: Unable to predict risk level. Please check API connection."),
            RiskBucket::Failure
        );
    }

    #[test]
    fn high_is_checked_before_low() {
        assert_eq!(RiskBucket::classify("high, previously low"), RiskBucket::High);
    }

    #[test]
    fn unmatched_text_is_unknown() {
        assert_eq!(RiskBucket::classify("Risk level unavailable"), RiskBucket::Unknown);
        assert_eq!(RiskBucket::classify(""), RiskBucket::Unknown);
    }

    #[test]
    fn substring_match_is_literal() {
        // "below" contains "low"; matching is substring-based, not word-based.
        assert_eq!(RiskBucket::classify("below threshold"), RiskBucket::Low);
    }
}
