//! HTTP source for club schedule pages
//!
//! One GET per month, bounded timeout, no retries:
//! https://www.alvark-tokyo.jp/schedule/?scheduleYear=2025&scheduleMonth=10

use anyhow::{Context, Result};
use schedule_extract::{FetchError, Fetcher, TeamProfile, YearMonth};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Accept",
            reqwest::header::HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert("Accept-Language", reqwest::header::HeaderValue::from_static("ja,en-US;q=0.7,en;q=0.3"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// GET `url` and return the body; any non-2xx status is an error.
    pub async fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| transport_error(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = resp.text().await.map_err(|e| transport_error(url, e))?;
        debug!("{} -> {} bytes", url, body.len());
        Ok(body)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Transport { url: url.to_string(), message: e.to_string() }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_month(&self, profile: &TeamProfile, month: YearMonth) -> Result<String, FetchError> {
        let url = profile.month_url(month);
        info!("Fetching {} schedule for {}", profile.id, month);
        self.fetch_url(&url).await
    }
}
