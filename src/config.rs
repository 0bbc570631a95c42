use std::env;
use std::path::PathBuf;
use std::time::Duration;

use schedule_fetcher::{FetcherConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Process settings from the environment (`.env` is loaded first).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let fetch_timeout_secs = env::var("SCHEDULE_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let user_agent = env::var("SCHEDULE_USER_AGENT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let log_dir = env::var("SCHEDULE_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        Self { fetch_timeout_secs, user_agent, log_dir }
    }

    pub fn fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}
