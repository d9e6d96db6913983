use std::env;
use std::time::Duration;

use tracing::debug;
use url::Url;

/// Deployment the dashboard talks to when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://6c8b7c166779.ngrok-free.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SUMMARIZE_PATH: &str = "summarise";
const PREDICT_PATH: &str = "predict";

const ENV_API_BASE: &str = "CRISIS_DASH_API_BASE";
const ENV_SUMMARIZE_URL: &str = "CRISIS_DASH_SUMMARIZE_URL";
const ENV_PREDICT_URL: &str = "CRISIS_DASH_PREDICT_URL";
const ENV_TIMEOUT_SECS: &str = "CRISIS_DASH_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} URL '{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid {name} URL '{value}': must be HTTP(S)")]
    InvalidScheme { name: &'static str, value: String },

    #[error("invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Values given on the command line. They take precedence over the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub summarize_url: Option<String>,
    pub predict_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Resolved endpoint configuration.
///
/// Resolution order per endpoint: explicit endpoint flag, `--api-base` flag,
/// explicit endpoint variable, `CRISIS_DASH_API_BASE`, then [`DEFAULT_API_BASE`].
#[derive(Debug, Clone)]
pub struct Config {
    pub summarize_url: Url,
    pub predict_url: Url,
    pub timeout: Duration,
}

impl Config {
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| env::var(key).ok())
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(base: &str) -> Result<Self, ConfigError> {
        Self::resolve_with(
            &Overrides {
                api_base: Some(base.to_string()),
                ..Default::default()
            },
            |_| None,
        )
    }

    fn resolve_with(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |v: &Option<String>| {
            v.as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let flag_base = flag(&overrides.api_base);
        let base = flag_base
            .clone()
            .or_else(|| var(ENV_API_BASE))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let summarize_url = match flag(&overrides.summarize_url)
            .or_else(|| if flag_base.is_some() { None } else { var(ENV_SUMMARIZE_URL) })
        {
            Some(raw) => parse_endpoint("summarize", &raw)?,
            None => endpoint_under("summarize", &base, SUMMARIZE_PATH)?,
        };

        let predict_url = match flag(&overrides.predict_url)
            .or_else(|| if flag_base.is_some() { None } else { var(ENV_PREDICT_URL) })
        {
            Some(raw) => parse_endpoint("predict", &raw)?,
            None => endpoint_under("predict", &base, PREDICT_PATH)?,
        };

        let timeout = match overrides.timeout_secs {
            Some(secs) => positive_secs(secs, &secs.to_string())?,
            None => match var(ENV_TIMEOUT_SECS) {
                Some(raw) => {
                    let secs = raw
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                    positive_secs(secs, &raw)?
                }
                None => DEFAULT_TIMEOUT,
            },
        };

        debug!(%summarize_url, %predict_url, timeout_secs = timeout.as_secs(), "config resolved");

        Ok(Self {
            summarize_url,
            predict_url,
            timeout,
        })
    }
}

fn positive_secs(secs: u64, raw: &str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout(raw.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_endpoint(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidScheme {
            name,
            value: raw.to_string(),
        }),
    }
}

fn endpoint_under(name: &'static str, base: &str, path: &str) -> Result<Url, ConfigError> {
    // Url::join replaces the last segment unless the base ends with '/'.
    let base = parse_endpoint(name, &format!("{}/", base.trim_end_matches('/')))?;
    base.join(path).map_err(|source| ConfigError::InvalidUrl {
        name,
        value: base.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(overrides: Overrides, vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::resolve_with(&overrides, |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_original_deployment() {
        let config = resolve(Overrides::default(), &[]).unwrap();
        assert_eq!(
            config.summarize_url.as_str(),
            "https://6c8b7c166779.ngrok-free.app/summarise"
        );
        assert_eq!(
            config.predict_url.as_str(),
            "https://6c8b7c166779.ngrok-free.app/predict"
        );
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn env_base_applies_to_both_endpoints() {
        let config = resolve(
            Overrides::default(),
            &[(ENV_API_BASE, "http://localhost:8000/api")],
        )
        .unwrap();
        assert_eq!(config.summarize_url.as_str(), "http://localhost:8000/api/summarise");
        assert_eq!(config.predict_url.as_str(), "http://localhost:8000/api/predict");
    }

    #[test]
    fn base_with_trailing_slash_is_not_doubled() {
        let config = resolve(
            Overrides {
                api_base: Some("http://host/api/".into()),
                ..Default::default()
            },
            &[],
        )
        .unwrap();
        assert_eq!(config.summarize_url.as_str(), "http://host/api/summarise");
    }

    #[test]
    fn explicit_endpoint_env_beats_env_base() {
        let config = resolve(
            Overrides::default(),
            &[
                (ENV_API_BASE, "http://base.example"),
                (ENV_PREDICT_URL, "http://risk.example/v2/risk"),
            ],
        )
        .unwrap();
        assert_eq!(config.summarize_url.as_str(), "http://base.example/summarise");
        assert_eq!(config.predict_url.as_str(), "http://risk.example/v2/risk");
    }

    #[test]
    fn flags_beat_environment() {
        let config = resolve(
            Overrides {
                api_base: Some("http://flag.example".into()),
                timeout_secs: Some(5),
                ..Default::default()
            },
            &[
                (ENV_SUMMARIZE_URL, "http://env.example/summarise"),
                (ENV_TIMEOUT_SECS, "60"),
            ],
        )
        .unwrap();
        assert_eq!(config.summarize_url.as_str(), "http://flag.example/summarise");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = resolve(
            Overrides::default(),
            &[(ENV_API_BASE, "   "), (ENV_TIMEOUT_SECS, "")],
        )
        .unwrap();
        assert!(config.summarize_url.as_str().starts_with(DEFAULT_API_BASE));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = resolve(
            Overrides {
                summarize_url: Some("ftp://example.com/summarise".into()),
                ..Default::default()
            },
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScheme { name: "summarize", .. }));
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = resolve(
            Overrides::default(),
            &[(ENV_PREDICT_URL, "not a url")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("predict"), "got: {err}");
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        let err = resolve(
            Overrides {
                timeout_secs: Some(0),
                ..Default::default()
            },
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));

        let err = resolve(Overrides::default(), &[(ENV_TIMEOUT_SECS, "soon")]).unwrap_err();
        assert!(err.to_string().contains("soon"));
    }
}
