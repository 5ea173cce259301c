use anyhow::Result;
use reqwest::Url;
use std::env;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: None,
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid backend URL '{}': {}", base_url, e))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!(
                "Backend URL must use http or https, got '{}'",
                url.scheme()
            ));
        }

        if timeout.map_or(false, |t| t.is_zero()) {
            return Err(anyhow::anyhow!("Timeout must be at least one second"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Reads `PDFQA_BACKEND_URL` and `PDFQA_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None, |key| env::var(key).ok())
    }

    /// Explicit values win; `lookup` is only consulted for the ones not given.
    pub fn resolve(
        base_url: Option<String>,
        timeout: Option<Duration>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_url = base_url
            .or_else(|| lookup("PDFQA_BACKEND_URL"))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        let timeout = match timeout {
            Some(timeout) => Some(timeout),
            None => lookup("PDFQA_TIMEOUT_SECS")
                .map(|secs| parse_timeout(&secs))
                .transpose()?,
        };

        Self::new(&base_url, timeout)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

pub fn parse_timeout(secs: &str) -> Result<Duration> {
    let secs: u64 = secs
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid timeout '{}': expected whole seconds", secs))?;
    if secs == 0 {
        return Err(anyhow::anyhow!("Invalid timeout '0': leave it unset for no timeout"));
    }
    Ok(Duration::from_secs(secs))
}
